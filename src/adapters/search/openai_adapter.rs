//! OpenAI Responses API adapter for the hackathon search agent.
//!
//! Enables the hosted `web_search` tool and constrains the answer with a strict
//! JSON schema (`{ items: DigestItem[] }`). Implements `SearchPort`.

use crate::domain::{DigestItem, DigestPayload, DomainError, SearchOutput, SearchRequest};
use crate::ports::SearchPort;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Web search plus generation routinely takes a minute or more.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);
const SCHEMA_NAME: &str = "hackathon_digest";

/// OpenAI Responses API search adapter.
pub struct OpenAiSearchAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSearchAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Responses endpoint (e.g., "https://api.openai.com/v1/responses")
    /// * `api_key` - API key
    /// * `model` - Model name (e.g., "gpt-4.1")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    /// JSON schema for the structured output. Every field is a required string.
    fn output_schema() -> Value {
        let string = json!({ "type": "string" });
        json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": string,
                            "summary": string,
                            "publisher": string,
                            "url": string,
                            "category": string,
                            "date": string,
                        },
                        "required": ["title", "summary", "publisher", "url", "category", "date"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["items"],
            "additionalProperties": false
        })
    }

    fn build_request(&self, request: &SearchRequest) -> ResponsesRequest {
        ResponsesRequest {
            model: self.model.clone(),
            instructions: request.instructions.clone(),
            input: request.input.clone(),
            tools: vec![Tool {
                tool_type: "web_search".to_string(),
            }],
            text: TextConfig {
                format: json!({
                    "type": "json_schema",
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": Self::output_schema(),
                }),
            },
        }
    }

    /// Sanitize JSON text from the model.
    ///
    /// Models occasionally wrap JSON in markdown code blocks even in schema mode.
    fn sanitize_json(raw_text: &str) -> String {
        let trimmed = raw_text.trim();

        // Handle markdown code blocks: ```json ... ``` or ``` ... ```
        if trimmed.starts_with("```") {
            let without_prefix = if trimmed.starts_with("```json") {
                trimmed.strip_prefix("```json").unwrap_or(trimmed)
            } else {
                trimmed.strip_prefix("```").unwrap_or(trimmed)
            };

            if let Some(end_idx) = without_prefix.rfind("```") {
                return without_prefix[..end_idx].trim().to_string();
            }
            return without_prefix.trim().to_string();
        }

        if let Some(start) = trimmed.find('{') {
            if let Some(end) = trimmed.rfind('}') {
                if start < end {
                    return trimmed[start..=end].to_string();
                }
            }
        }

        trimmed.to_string()
    }

    /// Parse and validate `output_text` into a payload capped at `max_items`.
    ///
    /// Items missing a title or URL are dropped rather than failing the run.
    fn parse_payload(output_text: &str, max_items: usize) -> Result<DigestPayload, DomainError> {
        let clean_json = Self::sanitize_json(output_text);
        let mut payload: DigestPayload = serde_json::from_str(&clean_json).map_err(|e| {
            warn!(error = %e, json = %clean_json.chars().take(200).collect::<String>(), "JSON parse failed");
            DomainError::InvalidSearchOutput(e.to_string())
        })?;

        let before = payload.items.len();
        payload.items.retain(is_usable);
        if payload.items.len() < before {
            warn!(
                dropped = before - payload.items.len(),
                "dropped items without title or url"
            );
        }
        if payload.items.len() > max_items {
            warn!(
                returned = payload.items.len(),
                max_items, "agent exceeded item cap, truncating"
            );
            payload.items.truncate(max_items);
        }
        Ok(payload)
    }
}

fn is_usable(item: &DigestItem) -> bool {
    !item.title.trim().is_empty() && !item.url.trim().is_empty()
}

/// Responses API request structure.
#[derive(Serialize)]
struct ResponsesRequest {
    model: String,
    instructions: String,
    input: String,
    tools: Vec<Tool>,
    text: TextConfig,
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "type")]
    tool_type: String,
}

#[derive(Serialize)]
struct TextConfig {
    format: Value,
}

/// Responses API response structure (only the parts we read).
#[derive(Deserialize)]
struct ResponsesResponse {
    /// Convenience field some gateways add; the raw API leaves it out.
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputEntry>,
}

#[derive(Deserialize)]
struct OutputEntry {
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenated `output_text` parts of all message outputs. None when there are none.
    fn output_text(&self) -> Option<String> {
        if let Some(text) = self.output_text.as_ref().filter(|t| !t.trim().is_empty()) {
            return Some(text.clone());
        }
        let text: String = self
            .output
            .iter()
            .filter(|entry| entry.entry_type == "message")
            .flat_map(|entry| entry.content.iter())
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait::async_trait]
impl SearchPort for OpenAiSearchAdapter {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutput, DomainError> {
        info!(
            model = %self.model,
            input_len = request.input.len(),
            max_items = request.max_items,
            "sending request to search agent"
        );

        let body = self.build_request(request);
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Search(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "search agent returned error");
            return Err(DomainError::Search(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Search(format!("Failed to parse API response: {}", e)))?;

        let output_text = parsed.output_text().ok_or(DomainError::NoSearchOutput)?;
        debug!(raw_len = output_text.len(), "received search agent output");

        let output_parsed = Self::parse_payload(&output_text, request.max_items)?;
        info!(items = output_parsed.items.len(), "search complete");

        Ok(SearchOutput {
            output_text,
            output_parsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ITEMS_JSON: &str = r#"{"items":[{"title":"Prague Hack","summary":"A weekend hackathon.","publisher":"Hack Club","url":"https://hack.example/prague","category":"hackathon","date":"2026-11-07"}]}"#;

    fn request(max_items: usize) -> SearchRequest {
        SearchRequest {
            instructions: "find things".to_string(),
            input: "hackathons in Prague".to_string(),
            min_items: 1,
            max_items,
        }
    }

    fn adapter(server: &MockServer) -> OpenAiSearchAdapter {
        OpenAiSearchAdapter::new(
            format!("{}/v1/responses", server.uri()),
            "sk-test".to_string(),
            "gpt-4.1".to_string(),
        )
    }

    fn message_response(text: &str) -> Value {
        json!({
            "id": "resp_1",
            "output": [
                { "type": "web_search_call", "id": "ws_1", "status": "completed" },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [ { "type": "output_text", "text": text, "annotations": [] } ]
                }
            ]
        })
    }

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"items": []}"#;
        assert_eq!(OpenAiSearchAdapter::sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = "```json\n{\"items\": []}\n```";
        assert_eq!(OpenAiSearchAdapter::sanitize_json(input), r#"{"items": []}"#);
    }

    #[test]
    fn test_request_enables_web_search_and_schema() {
        let adapter = OpenAiSearchAdapter::new(
            "http://localhost".to_string(),
            "k".to_string(),
            "m".to_string(),
        );
        let body = serde_json::to_value(adapter.build_request(&request(5))).unwrap();
        assert_eq!(body["tools"][0]["type"], "web_search");
        assert_eq!(body["text"]["format"]["type"], "json_schema");
        assert_eq!(body["text"]["format"]["strict"], true);
        let required = &body["text"]["format"]["schema"]["properties"]["items"]["items"]["required"];
        assert_eq!(required.as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_parse_payload_drops_unusable_and_truncates() {
        let text = r#"{"items":[
            {"title":"A","summary":"s","publisher":"p","url":"https://a","category":"c","date":"d"},
            {"title":" ","summary":"s","publisher":"p","url":"https://b","category":"c","date":"d"},
            {"title":"C","summary":"s","publisher":"p","url":"https://c","category":"c","date":"d"},
            {"title":"D","summary":"s","publisher":"p","url":"https://d","category":"c","date":"d"}
        ]}"#;
        let payload = OpenAiSearchAdapter::parse_payload(text, 2).unwrap();
        let titles: Vec<_> = payload.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_parse_payload_rejects_non_string_fields() {
        let text = r#"{"items":[{"title":1,"summary":"s","publisher":"p","url":"u","category":"c","date":"d"}]}"#;
        assert!(matches!(
            OpenAiSearchAdapter::parse_payload(text, 10),
            Err(DomainError::InvalidSearchOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_search_extracts_output_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_response(ITEMS_JSON)))
            .expect(1)
            .mount(&server)
            .await;

        let output = adapter(&server).search(&request(10)).await.unwrap();
        assert_eq!(output.output_text, ITEMS_JSON);
        assert_eq!(output.output_parsed.items.len(), 1);
        assert_eq!(output.output_parsed.items[0].title, "Prague Hack");
    }

    #[tokio::test]
    async fn test_search_without_message_output_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_2",
                "output": [ { "type": "web_search_call", "id": "ws_1", "status": "completed" } ]
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).search(&request(10)).await.unwrap_err();
        assert!(matches!(err, DomainError::NoSearchOutput));
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = adapter(&server).search(&request(10)).await.unwrap_err();
        match err {
            DomainError::Search(msg) => assert!(msg.contains("401")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
