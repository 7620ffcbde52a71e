//! Chat orchestrator: owns the conversation and resolves actions into turns.
//!
//! One orchestrator per chat session. It owns the append-only transcript and
//! the search dispatcher (and with it the session's result cache); both are
//! dropped with the orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use medinet_core::config::MedinetConfig;

use crate::client::{SearchClient, WebhookClient};
use crate::dispatcher::{ResultsPanel, SearchDispatcher};
use crate::error::ChatError;
use crate::normalizer::normalize;
use crate::parser::{classify_search_type, mentions_provider};
use crate::response::{ResponseGenerator, ERROR_MESSAGE};
use crate::script::{ConversationScript, DefaultScript};
use crate::types::{ActionItem, ActionKind, ActionOutcome, ChatReply, ConversationTurn, Role};

/// Result of a free-text submission.
#[derive(Debug)]
pub struct Submission {
    /// The AI turn appended in response.
    pub turn: ConversationTurn,
    /// Background search refreshing the results panel, when the message
    /// mentioned hospitals or doctors. Its failures are swallowed.
    pub enrichment: Option<JoinHandle<()>>,
}

/// What an action resolved to, before it is applied to the transcript.
enum Resolution {
    Navigate(String),
    Reply(ChatReply),
}

/// Central coordinator for one conversation.
pub struct ChatOrchestrator {
    webhook: Arc<dyn WebhookClient>,
    dispatcher: Arc<SearchDispatcher>,
    script: Arc<dyn ConversationScript>,
    responses: ResponseGenerator,
    turns: Mutex<Vec<ConversationTurn>>,
    responding: AtomicBool,
    max_message_length: usize,
}

impl ChatOrchestrator {
    /// Create an orchestrator over the given backends.
    pub fn new(
        webhook: Arc<dyn WebhookClient>,
        search: Arc<dyn SearchClient>,
        config: &MedinetConfig,
    ) -> Self {
        Self {
            webhook,
            dispatcher: Arc::new(SearchDispatcher::new(search, &config.search)),
            script: Arc::new(DefaultScript),
            responses: ResponseGenerator::new(),
            turns: Mutex::new(Vec::new()),
            responding: AtomicBool::new(false),
            max_message_length: config.chat.max_message_length,
        }
    }

    /// Replace the scripted-branch provider.
    pub fn with_script(mut self, script: Arc<dyn ConversationScript>) -> Self {
        self.script = script;
        self
    }

    /// Handle a click on an action button.
    ///
    /// Resolves to exactly one terminal behavior: a route change or one
    /// appended AI turn. Any failure becomes an error turn carrying a single
    /// "Try again" action that re-invokes `action`. Returns `Busy` without
    /// side effects while a previous dispatch is still pending.
    pub async fn handle_action(&self, action: &ActionItem) -> Result<ActionOutcome, ChatError> {
        let _responding = self.begin_response()?;

        match self.resolve(action).await {
            Ok(Resolution::Navigate(route)) => {
                info!(route = %route, "Navigating");
                Ok(ActionOutcome::Navigate { route })
            }
            Ok(Resolution::Reply(reply)) => Ok(ActionOutcome::Turn(self.append(reply.into_turn()))),
            Err(e) => {
                warn!(kind = action.kind.as_str(), label = %action.label, error = %e, "Action failed");
                let turn = ConversationTurn::ai_error(ERROR_MESSAGE, ActionItem::retry(action));
                Ok(ActionOutcome::Turn(self.append(turn)))
            }
        }
    }

    /// Send free text to the assistant.
    ///
    /// Appends the user's turn, then the assistant's answer (or an error turn
    /// whose retry searches the classified index for the same text).
    pub async fn submit(&self, text: &str) -> Result<Submission, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let _responding = self.begin_response()?;
        self.append(ConversationTurn::user(text));

        let payload = match self.webhook.send_message(text).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Assistant webhook failed");
                let retry =
                    ActionItem::search(classify_search_type(text), "Try again", text, None);
                let turn = self.append(ConversationTurn::ai_error(ERROR_MESSAGE, retry));
                return Ok(Submission {
                    turn,
                    enrichment: None,
                });
            }
        };

        let turn = self.append(normalize(&payload).into_turn());
        let enrichment = mentions_provider(text).then(|| self.spawn_enrichment(text));

        Ok(Submission { turn, enrichment })
    }

    /// Snapshot of the conversation so far, in append order.
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.lock_turns().clone()
    }

    /// Actions of the most recent AI turn, if any.
    pub fn last_actions(&self) -> Vec<ActionItem> {
        self.lock_turns()
            .iter()
            .rev()
            .find(|t| t.role == Role::Ai)
            .and_then(|t| t.actions.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the results panel.
    pub fn panel(&self) -> ResultsPanel {
        self.dispatcher.panel()
    }

    /// The session's search dispatcher and its result cache.
    pub fn dispatcher(&self) -> &Arc<SearchDispatcher> {
        &self.dispatcher
    }

    /// True while an action or submission is being dispatched.
    pub fn is_responding(&self) -> bool {
        self.responding.load(Ordering::SeqCst)
    }

    // -- Private helpers --

    async fn resolve(&self, action: &ActionItem) -> Result<Resolution, ChatError> {
        match action.kind {
            ActionKind::Navigate => {
                if let Some(target) = action.target_text() {
                    return Ok(Resolution::Navigate(route_for(target)));
                }
            }
            ActionKind::ToolCall => {
                let payload = self
                    .webhook
                    .call_tool(action.target_text(), action.parameters.as_ref())
                    .await?;
                return Ok(Resolution::Reply(normalize(&payload)));
            }
            ActionKind::Action => {
                if let Some(target) = action.target_text() {
                    if let Some(reply) = self.script.reply(target).await {
                        debug!(script_target = target, "Scripted reply");
                        return Ok(Resolution::Reply(reply));
                    }
                }
            }
            _ => {}
        }

        let query = action.query_text();
        if !query.trim().is_empty() {
            let search_type = action.kind.search_type();
            let filters = action.filters.as_ref();
            let results = self.dispatcher.search(query, search_type, filters).await?;
            return Ok(Resolution::Reply(self.responses.compose_search_reply(
                query,
                search_type,
                filters,
                &results,
            )));
        }

        Ok(Resolution::Reply(self.responses.fallback_reply(&action.label)))
    }

    fn spawn_enrichment(&self, text: &str) -> JoinHandle<()> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let query = text.to_string();
        let search_type = classify_search_type(text);
        tokio::spawn(async move {
            if let Err(e) = dispatcher.search(&query, search_type, None).await {
                debug!(error = %e, "Background search failed");
            }
        })
    }

    fn begin_response(&self) -> Result<Responding<'_>, ChatError> {
        self.responding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::Busy)?;
        Ok(Responding {
            flag: &self.responding,
        })
    }

    fn append(&self, turn: ConversationTurn) -> ConversationTurn {
        self.lock_turns().push(turn.clone());
        turn
    }

    fn lock_turns(&self) -> MutexGuard<'_, Vec<ConversationTurn>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the responding flag when the dispatch ends, however it ends.
struct Responding<'a> {
    flag: &'a AtomicBool,
}

impl Drop for Responding<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side route for a navigate target.
fn route_for(target: &str) -> String {
    if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{}", target)
    }
}

// =============================================================================
// Tests
// =============================================================================
