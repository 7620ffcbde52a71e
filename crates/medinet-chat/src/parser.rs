//! Keyword classification of free-text messages.
//!
//! Decides whether a message is about providers at all and, if so, which
//! index to search. Plain substring matching, case-insensitive.

use std::sync::LazyLock;

use regex::Regex;

use medinet_core::types::SearchType;

static PROVIDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hospital|doctor").expect("Invalid provider regex"));

static DOCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)doctor|specialist|surgeon").expect("Invalid doctor regex")
});

/// True when the message mentions hospitals or doctors and should refresh
/// the results panel.
pub fn mentions_provider(text: &str) -> bool {
    PROVIDER_RE.is_match(text)
}

/// Doctors for "doctor" / "specialist" / "surgeon", hospitals otherwise.
pub fn classify_search_type(text: &str) -> SearchType {
    if DOCTOR_RE.is_match(text) {
        SearchType::Doctor
    } else {
        SearchType::Hospital
    }
}
