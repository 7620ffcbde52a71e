//! Network seams: the vector-search endpoint and the conversational webhook.
//!
//! Both are narrow traits so the controller can be driven by in-memory fakes.
//! The `Http*` implementations talk to the real services with `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use medinet_core::config::{ChatConfig, SearchConfig};
use medinet_core::types::{SearchFilters, SearchResult, SearchType};

use crate::error::ChatError;

// =============================================================================
// Wire types
// =============================================================================

/// Body of a vector-search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
    pub filters: RequestFilters,
}

/// User filters plus the tuning knobs sent with every search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestFilters {
    #[serde(flatten)]
    pub filters: SearchFilters,
    pub threshold: f64,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Body posted to the conversational webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookRequest {
    Message {
        message: String,
    },
    ToolCall {
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<Map<String, Value>>,
    },
}

impl WebhookRequest {
    pub fn message(text: impl Into<String>) -> Self {
        WebhookRequest::Message {
            message: text.into(),
        }
    }

    pub fn tool_call(target: Option<String>, parameters: Option<Map<String, Value>>) -> Self {
        WebhookRequest::ToolCall {
            action: "tool_call".to_string(),
            target,
            parameters,
        }
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Vector search over hospitals and doctors.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one search. Non-success responses are `ChatError::SearchRequest`.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, ChatError>;
}

/// The conversational assistant behind a webhook.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Post free text. Non-success responses are `ChatError::Webhook`.
    async fn send_message(&self, message: &str) -> Result<Value, ChatError>;

    /// Post a tool call. Non-success responses are `ChatError::ToolCall`.
    async fn call_tool(
        &self,
        target: Option<&str>,
        parameters: Option<&Map<String, Value>>,
    ) -> Result<Value, ChatError>;
}

// =============================================================================
// HttpSearchClient
// =============================================================================

/// `SearchClient` backed by the REST backend's vector-search endpoint.
#[derive(Clone)]
pub struct HttpSearchClient {
    client: Client,
    endpoint: String,
}

impl HttpSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, ChatError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), query = %request.query, "Vector search failed");
            return Err(ChatError::SearchRequest(status.as_u16()));
        }

        let body: SearchResponse = resp.json().await?;
        let results = body
            .results
            .into_iter()
            .filter_map(|raw| match SearchResult::from_value(request.search_type, raw) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable search hit");
                    None
                }
            })
            .collect();
        Ok(results)
    }
}

// =============================================================================
// HttpWebhookClient
// =============================================================================

/// `WebhookClient` posting JSON to the configured webhook URLs.
#[derive(Clone)]
pub struct HttpWebhookClient {
    client: Client,
    webhook_url: String,
    tool_url: String,
}

impl HttpWebhookClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
            tool_url: config.tool_url().to_string(),
        })
    }

    /// Post `body` and return the decoded answer. Non-success statuses are
    /// mapped through `on_status`.
    async fn post(
        &self,
        url: &str,
        body: &WebhookRequest,
        on_status: fn(u16) -> ChatError,
    ) -> Result<Value, ChatError> {
        let resp = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url, "Webhook request failed");
            return Err(on_status(status.as_u16()));
        }

        let text = resp.text().await?;
        Ok(decode_body(text))
    }
}

/// Parse a webhook body. Bare text, whether raw or a JSON string, is routed
/// through `output` so the normalizer treats it as the message body.
fn decode_body(text: String) -> Value {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::String(s)) => json!({ "output": s }),
        Ok(value) => value,
        Err(_) => {
            debug!(len = text.len(), "Webhook answered with non-JSON body");
            json!({ "output": text })
        }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn send_message(&self, message: &str) -> Result<Value, ChatError> {
        self.post(&self.webhook_url, &WebhookRequest::message(message), ChatError::Webhook)
            .await
    }

    async fn call_tool(
        &self,
        target: Option<&str>,
        parameters: Option<&Map<String, Value>>,
    ) -> Result<Value, ChatError> {
        let body = WebhookRequest::tool_call(target.map(str::to_string), parameters.cloned());
        self.post(&self.tool_url, &body, ChatError::ToolCall).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_body_shape() {
        let request = SearchRequest {
            query: "heart surgery".to_string(),
            search_type: SearchType::Hospital,
            filters: RequestFilters {
                filters: SearchFilters {
                    country: Some("Thailand".to_string()),
                    ..Default::default()
                },
                threshold: 0.5,
                limit: 12,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "query": "heart surgery",
                "type": "hospital",
                "filters": {"country": "Thailand", "threshold": 0.5, "limit": 12}
            })
        );
    }

    #[test]
    fn test_webhook_message_body() {
        let value = serde_json::to_value(WebhookRequest::message("hello")).unwrap();
        assert_eq!(value, json!({"message": "hello"}));
    }

    #[test]
    fn test_webhook_tool_call_body() {
        let mut params = Map::new();
        params.insert("hospitalId".to_string(), json!("h-1"));
        let value = serde_json::to_value(WebhookRequest::tool_call(
            Some("book_appointment".to_string()),
            Some(params),
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "action": "tool_call",
                "target": "book_appointment",
                "parameters": {"hospitalId": "h-1"}
            })
        );

        let bare = serde_json::to_value(WebhookRequest::tool_call(None, None)).unwrap();
        assert_eq!(bare, json!({"action": "tool_call"}));
    }

    #[test]
    fn test_decode_body_wraps_bare_text() {
        assert_eq!(decode_body("Sure".to_string()), json!({"output": "Sure"}));
        assert_eq!(decode_body("\"Sure\"".to_string()), json!({"output": "Sure"}));
        assert_eq!(
            decode_body(r#"{"message":"hi"}"#.to_string()),
            json!({"message": "hi"})
        );
    }

    #[test]
    fn test_http_clients_build_from_default_config() {
        assert!(HttpSearchClient::new(&SearchConfig::default()).is_ok());
        let webhook = HttpWebhookClient::new(&ChatConfig::default()).unwrap();
        assert_eq!(webhook.tool_url, webhook.webhook_url);
    }
}
