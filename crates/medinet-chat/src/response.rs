//! Response generation for search-backed turns.
//!
//! Composes the deterministic summary sentence and contextual follow-up
//! actions from a ranked result list, without calling the assistant.

use medinet_core::types::{SearchFilters, SearchResult, SearchType};

use crate::types::{ActionItem, ChatReply};

/// Body of every error bubble.
pub const ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// Rating threshold offered by the "top rated" follow-up.
const TOP_RATED: f64 = 4.0;

/// Generates chat replies from search results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseGenerator;

impl ResponseGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Summary sentence plus follow-ups for a completed search.
    pub fn compose_search_reply(
        &self,
        query: &str,
        search_type: SearchType,
        filters: Option<&SearchFilters>,
        results: &[SearchResult],
    ) -> ChatReply {
        let message = self.summarize(search_type, results.len(), filters);
        let actions = if results.is_empty() {
            vec![]
        } else {
            self.follow_ups(query, search_type, filters)
        };
        ChatReply::new(message, actions)
    }

    /// Deterministic one-sentence description of a search outcome.
    ///
    /// Qualifiers are appended in a fixed order: specialty, country, city,
    /// halal.
    pub fn summarize(
        &self,
        search_type: SearchType,
        count: usize,
        filters: Option<&SearchFilters>,
    ) -> String {
        if count == 0 {
            return format!(
                "I'm sorry, I couldn't find any {} matching your request. Could you try rephrasing your question?",
                search_type.noun(0)
            );
        }

        let mut sentence = format!("I found {} {} for you", count, search_type.noun(count));
        if let Some(f) = filters {
            if let Some(ref specialty) = f.specialty {
                sentence.push_str(&format!(" specializing in {}", specialty));
            }
            if let Some(ref country) = f.country {
                sentence.push_str(&format!(" in {}", country));
            }
            if let Some(ref city) = f.city {
                sentence.push_str(&format!(" near {}", city));
            }
            if f.is_halal == Some(true) {
                sentence.push_str(" with halal certification");
            }
        }
        sentence.push_str(". The results are displayed on the right.");
        sentence
    }

    /// Up to three refinements of a non-empty search.
    ///
    /// Refinements already in effect are not offered again.
    pub fn follow_ups(
        &self,
        query: &str,
        search_type: SearchType,
        filters: Option<&SearchFilters>,
    ) -> Vec<ActionItem> {
        let base = filters.cloned().unwrap_or_default();
        let mut actions = Vec::with_capacity(3);

        if base.min_rating.map_or(true, |r| r < TOP_RATED) {
            actions.push(ActionItem::search(
                search_type,
                format!("Show only 4+ rated {}", search_type.noun(2)),
                query,
                Some(SearchFilters {
                    min_rating: Some(TOP_RATED),
                    ..base.clone()
                }),
            ));
        }

        if base.is_halal != Some(true) {
            actions.push(ActionItem::search(
                search_type,
                format!("Show halal-certified {} only", search_type.noun(2)),
                query,
                Some(SearchFilters {
                    is_halal: Some(true),
                    ..base.clone()
                }),
            ));
        }

        if search_type == SearchType::Hospital {
            actions.push(ActionItem::search(
                SearchType::Doctor,
                "Show doctors at these hospitals",
                query,
                if base.is_empty() { None } else { Some(base) },
            ));
        }

        actions
    }

    /// Generic reply for an action that carries nothing to act on.
    pub fn fallback_reply(&self, label: &str) -> ChatReply {
        let subject = if label.trim().is_empty() {
            "that"
        } else {
            label.trim()
        };
        ChatReply::new(
            format!(
                "I'll help you with {}. What would you like to search for?",
                subject
            ),
            vec![
                ActionItem::search(SearchType::Hospital, "Search hospitals", "hospitals", None),
                ActionItem::search(SearchType::Doctor, "Search doctors", "doctors", None),
            ],
        )
    }
}
