//! Conversational search assistant for the Medinet dashboard.
//!
//! Normalizes assistant webhook payloads, caches vector searches for the
//! session, resolves clicked actions into new conversation turns, and renders
//! the assistant's inline markdown.

pub mod cache;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod markdown;
pub mod normalizer;
pub mod orchestrator;
pub mod parser;
pub mod response;
pub mod script;
pub mod types;

pub use cache::{CacheKey, ResultCache};
pub use client::{
    HttpSearchClient, HttpWebhookClient, SearchClient, SearchRequest, WebhookClient,
    WebhookRequest,
};
pub use dispatcher::{ResultsPanel, SearchDispatcher};
pub use error::ChatError;
pub use markdown::{render_line, render_message, Fragment};
pub use normalizer::{normalize, NormalizationFallback, WebhookPayload};
pub use orchestrator::{ChatOrchestrator, Submission};
pub use response::ResponseGenerator;
pub use script::{ConversationScript, DefaultScript};
pub use types::{ActionItem, ActionKind, ActionOutcome, ChatReply, ConversationTurn, Role};
