//! Error types for the conversational interface.

use medinet_core::error::MedinetError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("assistant is still responding")]
    Busy,
    #[error("search request failed with status {0}")]
    SearchRequest(u16),
    #[error("tool call failed with status {0}")]
    ToolCall(u16),
    #[error("webhook request failed with status {0}")]
    Webhook(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MedinetError> for ChatError {
    fn from(err: MedinetError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::InvalidResponse(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(ChatError::EmptyQuery.to_string(), "search query cannot be empty");
        assert_eq!(ChatError::Busy.to_string(), "assistant is still responding");
        assert_eq!(
            ChatError::SearchRequest(502).to_string(),
            "search request failed with status 502"
        );
        assert_eq!(
            ChatError::ToolCall(500).to_string(),
            "tool call failed with status 500"
        );
        assert_eq!(
            ChatError::Webhook(404).to_string(),
            "webhook request failed with status 404"
        );
        assert_eq!(
            ChatError::Transport("connection refused".to_string()).to_string(),
            "transport error: connection refused"
        );
    }

    #[test]
    fn test_chat_error_from_medinet_error() {
        let err: ChatError = MedinetError::InvalidSearchType("clinic".to_string()).into();
        assert!(matches!(err, ChatError::Internal(_)));
        assert!(err.to_string().contains("clinic"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::ToolCall(500));
        assert!(dbg.contains("ToolCall"));
    }
}
