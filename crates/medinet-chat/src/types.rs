//! Conversation data model: turns, actions, and replies.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use medinet_core::types::{SearchFilters, SearchType};

// =============================================================================
// Role
// =============================================================================

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ai,
    User,
}

// =============================================================================
// ActionKind
// =============================================================================

/// Behavior tag of an [`ActionItem`].
///
/// Unknown upstream tags are kept verbatim in `Other` so they can be echoed
/// back and still resolve through the engine's fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Hospital,
    Doctor,
    Navigate,
    Action,
    ToolCall,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Hospital => "hospital",
            ActionKind::Doctor => "doctor",
            ActionKind::Navigate => "navigate",
            ActionKind::Action => "action",
            ActionKind::ToolCall => "tool_call",
            ActionKind::Other(s) => s,
        }
    }

    /// Index a query-carrying action searches: doctors for `doctor`,
    /// hospitals for everything else.
    pub fn search_type(&self) -> SearchType {
        match self {
            ActionKind::Doctor => SearchType::Doctor,
            _ => SearchType::Hospital,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        match s {
            "hospital" => ActionKind::Hospital,
            "doctor" => ActionKind::Doctor,
            "navigate" => ActionKind::Navigate,
            "action" => ActionKind::Action,
            "tool_call" => ActionKind::ToolCall,
            other => ActionKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        ActionKind::from(s.as_str())
    }
}

impl From<SearchType> for ActionKind {
    fn from(t: SearchType) -> Self {
        match t {
            SearchType::Hospital => ActionKind::Hospital,
            SearchType::Doctor => ActionKind::Doctor,
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

// =============================================================================
// ActionItem
// =============================================================================

/// A follow-up the user can click. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl ActionItem {
    /// A search follow-up against the given index.
    pub fn search(
        search_type: SearchType,
        label: impl Into<String>,
        query: impl Into<String>,
        filters: Option<SearchFilters>,
    ) -> Self {
        Self {
            kind: search_type.into(),
            label: label.into(),
            query: Some(query.into()),
            filters,
            target: None,
            parameters: None,
        }
    }

    /// A "Try again" button that re-invokes `original` unchanged.
    pub fn retry(original: &ActionItem) -> Self {
        Self {
            label: "Try again".to_string(),
            ..original.clone()
        }
    }

    /// The search query, or `""` when none is set.
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    /// The target, treating an empty string as absent.
    pub fn target_text(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.is_empty())
    }
}

// =============================================================================
// ConversationTurn
// =============================================================================

/// One message in the append-only conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// RFC 3339 local time of creation.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub is_error: bool,
}

impl ConversationTurn {
    fn new(role: Role, text: String, actions: Option<Vec<ActionItem>>, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            timestamp: Local::now().to_rfc3339(),
            actions: actions.filter(|a| !a.is_empty()),
            is_error,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), None, false)
    }

    pub fn ai(text: impl Into<String>, actions: Option<Vec<ActionItem>>) -> Self {
        Self::new(Role::Ai, text.into(), actions, false)
    }

    /// An error bubble carrying a single retry action.
    pub fn ai_error(text: impl Into<String>, retry: ActionItem) -> Self {
        Self::new(Role::Ai, text.into(), Some(vec![retry]), true)
    }
}

// =============================================================================
// ChatReply / ActionOutcome
// =============================================================================

/// Canonical `{ message, actions }` shape every AI turn is built from.
///
/// `actions` is either `None` or non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionItem>>,
}

impl ChatReply {
    pub fn new(message: impl Into<String>, actions: Vec<ActionItem>) -> Self {
        Self {
            message: message.into(),
            actions: if actions.is_empty() { None } else { Some(actions) },
        }
    }

    pub fn action_count(&self) -> usize {
        self.actions.as_ref().map_or(0, Vec::len)
    }

    pub fn into_turn(self) -> ConversationTurn {
        ConversationTurn::ai(self.message, self.actions)
    }
}

/// Terminal behavior of one action dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A client-side route change; no turn was appended.
    Navigate { route: String },
    /// A turn was appended to the conversation.
    Turn(ConversationTurn),
}
