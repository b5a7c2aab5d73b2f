//! Google Gemini API client

use crate::agent::{
    AgentClientConfig, AgentError, ChatRequest, ModelClient, ModelOutput, TokenUsage, ToolCall,
    ToolSpec, Turn,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    config: AgentClientConfig,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentError::Configuration("API key required for Gemini".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn build_request(&self, request: &ChatRequest) -> GeminiRequest {
        let system_instruction = request.system.as_ref().map(|text| GeminiSystemInstruction {
            parts: vec![GeminiPart::Text { text: text.clone() }],
        });

        let contents = request.messages.iter().map(convert_turn).collect();

        GeminiRequest {
            contents,
            system_instruction,
            tools: if request.tools.is_empty() {
                None
            } else {
                Some(vec![GeminiTools {
                    function_declarations: request
                        .tools
                        .iter()
                        .map(|t| GeminiFunctionDeclaration {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        })
                        .collect(),
                }])
            },
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            }),
        }
    }

    fn convert_response(response: GeminiResponse) -> Result<ModelOutput, AgentError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Malformed("response contains no candidates".into()))?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.parts {
            match part {
                GeminiPart::Text { text: t } => text.push_str(&t),
                GeminiPart::FunctionCall { function_call } => tool_calls.push(ToolCall {
                    name: function_call.name,
                    args: function_call.args,
                }),
                GeminiPart::FunctionResponse { .. } => {}
            }
        }

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count as u64,
                completion_tokens: u.candidates_token_count as u64,
            })
            .unwrap_or_default();

        Ok(ModelOutput {
            text,
            tool_calls,
            usage,
        })
    }
}

fn convert_turn(turn: &Turn) -> GeminiContent {
    match turn {
        Turn::User { text } => GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart::Text { text: text.clone() }],
        },
        Turn::ModelCalls { calls } => GeminiContent {
            role: "model".to_string(),
            parts: calls
                .iter()
                .map(|call| GeminiPart::FunctionCall {
                    function_call: GeminiFunctionCall {
                        name: call.name.clone(),
                        args: call.args.clone(),
                    },
                })
                .collect(),
        },
        Turn::ToolResults { results } => GeminiContent {
            role: "user".to_string(),
            parts: results
                .iter()
                .map(|result| GeminiPart::FunctionResponse {
                    function_response: GeminiFunctionResponse {
                        name: result.name.clone(),
                        response: serde_json::json!({ "result": result.content }),
                    },
                })
                .collect(),
        },
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &ChatRequest) -> Result<ModelOutput, AgentError> {
        let body = self.build_request(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.config.model,
        );

        debug!("Gemini request to {} ({} turns)", url, request.messages.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                let retry_after_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(AgentError::RateLimited { retry_after_secs });
            }

            if status.is_server_error() {
                return Err(AgentError::Unavailable(format!(
                    "Gemini returned {}",
                    status
                )));
            }

            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Malformed(e.to_string()))?;

        Self::convert_response(api_response)
    }
}

// API request/response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTools>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: GeminiFunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: GeminiFunctionResponse,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GeminiTools {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_requires_api_key() {
        let result = GeminiClient::new(AgentClientConfig::default());
        assert!(matches!(result, Err(AgentError::Configuration(_))));
    }

    #[test]
    fn test_request_serialization_is_camel_case() {
        let client =
            GeminiClient::new(AgentClientConfig::new().with_api_key("test-key")).unwrap();

        let request = ChatRequest {
            system: Some("You are a clinician.".to_string()),
            messages: vec![Turn::User {
                text: "Assess the patient".to_string(),
            }],
            tools: vec![ToolSpec {
                name: "medical_guideline_lookup".to_string(),
                description: "Guideline lookup".to_string(),
                parameters: json!({"type": "object"}),
            }],
        };

        let body = serde_json::to_value(client.build_request(&request)).unwrap();
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("clinician"));
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "medical_guideline_lookup"
        );
        assert!(body["generationConfig"]["maxOutputTokens"].is_number());
    }

    #[test]
    fn test_response_parsing_text_and_function_call() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Checking guidelines. "},
                        {"functionCall": {"name": "medical_guideline_lookup", "args": {"condition": "migraine"}}}
                    ]
                }
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7}
        });

        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let output = GeminiClient::convert_response(response).unwrap();

        assert_eq!(output.text, "Checking guidelines. ");
        assert_eq!(output.tool_calls.len(), 1);
        assert_eq!(output.tool_calls[0].name, "medical_guideline_lookup");
        assert_eq!(output.usage.prompt_tokens, 12);
        assert_eq!(output.usage.completion_tokens, 7);
    }

    #[test]
    fn test_empty_candidates_is_malformed() {
        let response: GeminiResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        let result = GeminiClient::convert_response(response);
        assert!(matches!(result, Err(AgentError::Malformed(_))));
    }

    /// Serve one canned HTTP response on an ephemeral port
    async fn stub_server(response: String) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                // Drain the request before answering
                let mut buf = vec![0u8; 16384];
                let mut read = 0;
                loop {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            read += n;
                            let text = String::from_utf8_lossy(&buf[..read]);
                            if let Some(header_end) = text.find("\r\n\r\n") {
                                let content_length = text
                                    .lines()
                                    .find_map(|line| {
                                        let (name, value) = line.split_once(':')?;
                                        if name.eq_ignore_ascii_case("content-length") {
                                            value.trim().parse::<usize>().ok()
                                        } else {
                                            None
                                        }
                                    })
                                    .unwrap_or(0);
                                if read >= header_end + 4 + content_length {
                                    break;
                                }
                            }
                        }
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::new(
            AgentClientConfig::new()
                .with_api_key("test-key")
                .with_base_url(base_url),
        )
        .unwrap()
    }

    fn simple_request() -> ChatRequest {
        ChatRequest {
            system: None,
            messages: vec![Turn::User {
                text: "Assess the patient".to_string(),
            }],
            tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_success_status_parses_body() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"assessment"}]}}]}"#;
        let base = stub_server(format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        ))
        .await;

        let output = client_for(base).generate(&simple_request()).await.unwrap();
        assert_eq!(output.text, "assessment");
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limited() {
        let base = stub_server(
            "HTTP/1.1 429 Too Many Requests\r\nretry-after: 7\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let result = client_for(base).generate(&simple_request()).await;
        assert!(matches!(
            result,
            Err(AgentError::RateLimited { retry_after_secs: 7 })
        ));
    }

    #[tokio::test]
    async fn test_429_without_retry_after_defaults_to_60() {
        let base = stub_server(
            "HTTP/1.1 429 Too Many Requests\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let result = client_for(base).generate(&simple_request()).await;
        assert!(matches!(
            result,
            Err(AgentError::RateLimited {
                retry_after_secs: 60
            })
        ));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_unavailable() {
        let base = stub_server(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let result = client_for(base).generate(&simple_request()).await;
        assert!(matches!(result, Err(AgentError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_client_error_maps_to_api_with_body() {
        let body = r#"{"error":{"message":"quota exceeded"}}"#;
        let base = stub_server(format!(
            "HTTP/1.1 400 Bad Request\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        ))
        .await;

        let result = client_for(base).generate(&simple_request()).await;
        assert!(matches!(
            result,
            Err(AgentError::Api { status: 400, ref message }) if message.contains("quota exceeded")
        ));
    }
}
