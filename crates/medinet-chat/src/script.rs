//! Scripted conversational branches.
//!
//! Some `action` targets are answered from a fixed script rather than the
//! assistant. The provider is awaited like any other backend, so a slower or
//! remote script can be swapped in without touching the orchestrator.

use async_trait::async_trait;

use medinet_core::types::{SearchFilters, SearchType};

use crate::types::{ActionItem, ChatReply};

/// Target of the country picker.
pub const SEARCH_BY_COUNTRY: &str = "search_by_country";

/// Countries offered by the country picker, in display order.
pub const FEATURED_COUNTRIES: [&str; 3] = ["Singapore", "Malaysia", "Thailand"];

/// Source of canned replies for `action` targets.
#[async_trait]
pub trait ConversationScript: Send + Sync {
    /// The reply for `target`, or `None` when the target is not scripted.
    async fn reply(&self, target: &str) -> Option<ChatReply>;
}

/// Built-in script: the country picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScript;

#[async_trait]
impl ConversationScript for DefaultScript {
    async fn reply(&self, target: &str) -> Option<ChatReply> {
        match target {
            SEARCH_BY_COUNTRY => Some(country_menu()),
            _ => None,
        }
    }
}

fn country_menu() -> ChatReply {
    let actions = FEATURED_COUNTRIES
        .iter()
        .map(|country| {
            ActionItem::search(
                SearchType::Hospital,
                format!("Hospitals in {}", country),
                format!("hospitals in {}", country),
                Some(SearchFilters {
                    country: Some((*country).to_string()),
                    ..Default::default()
                }),
            )
        })
        .collect();

    ChatReply::new(
        "Which country would you like to search in? Here are our most popular destinations:",
        actions,
    )
}
