use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use crate::llm::{CompletionRequest, ImageRequest};
use crate::stream::StreamEvent;
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zakai_core::{ZakaiError, ZakaiResult};

/// OpenAI-compatible API backend.
///
/// Works with OpenAI, OpenRouter, Groq, and any other provider that
/// implements the chat completions API.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn build_body(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "messages": request.messages,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        if stream {
            body["stream"] = serde_json::json!(true);
        }
        body
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/zakai-chat/zakai")
                .header("X-Title", "ZakAI")
        } else {
            request
        }
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> ZakaiResult<serde_json::Value> {
        let url = format!("{}{path}", self.config.base_url());
        debug!(url = %url, "POST");

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| ZakaiError::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ZakaiError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> ZakaiError {
    ZakaiError::Http(format!("OpenAI API error {status}: {body}"))
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, request: CompletionRequest) -> ZakaiResult<String> {
        let body = self.build_body(&request, false);
        let resp_body = self.post_json("/v1/chat/completions", &body).await?;
        parse_openai_response(&resp_body)
    }

    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> ZakaiResult<(mpsc::Receiver<StreamEvent>, JoinHandle<ZakaiResult<String>>)> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let body = self.build_body(&request, true);

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ZakaiError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(api_error(status, &error_body));
        }

        let (tx, rx) = mpsc::channel::<StreamEvent>(256);
        let byte_stream = resp.bytes_stream();

        let handle = tokio::spawn(async move {
            let mut stream = byte_stream;
            let mut buffer = String::new();
            let mut full_text = String::new();

            while let Some(chunk_result) = stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let message = format!("Stream read error: {e}");
                        let _ = tx
                            .send(StreamEvent::Error {
                                message: message.clone(),
                            })
                            .await;
                        return Err(ZakaiError::Http(message));
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
                        continue;
                    };

                    if data == "[DONE]" {
                        let _ = tx.send(StreamEvent::Done).await;
                        return Ok(full_text);
                    }

                    let event: serde_json::Value = match serde_json::from_str(data) {
                        Ok(v) => v,
                        Err(e) => {
                            warn!(error = %e, "Skipping malformed stream event");
                            continue;
                        }
                    };

                    if let Some(error) = event.get("error") {
                        let message = error["message"]
                            .as_str()
                            .map_or_else(|| error.to_string(), str::to_string);
                        let _ = tx
                            .send(StreamEvent::Error {
                                message: message.clone(),
                            })
                            .await;
                        return Err(ZakaiError::Http(message));
                    }

                    if let Some(content) = event["choices"][0]["delta"]["content"].as_str() {
                        if !content.is_empty() {
                            full_text.push_str(content);
                            let _ = tx
                                .send(StreamEvent::TextDelta {
                                    text: content.to_string(),
                                })
                                .await;
                        }
                    }
                }
            }

            // Body ended without the [DONE] sentinel.
            let _ = tx.send(StreamEvent::Done).await;
            Ok(full_text)
        });

        Ok((rx, handle))
    }

    async fn generate_image(&self, request: ImageRequest) -> ZakaiResult<String> {
        let body = serde_json::json!({
            "model": self.config.image_model,
            "prompt": request.prompt,
            "n": request.n,
            "size": request.size,
        });
        let resp_body = self.post_json("/v1/images/generations", &body).await?;
        parse_image_response(&resp_body)
    }
}

/// Text of the first choice of a chat-completion reply.
pub fn parse_openai_response(body: &serde_json::Value) -> ZakaiResult<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ZakaiError::Agent(format!("completion reply has no message content: {body}")))
}

/// URL of the first image of an image-generation reply.
pub fn parse_image_response(body: &serde_json::Value) -> ZakaiResult<String> {
    body["data"][0]["url"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ZakaiError::Agent(format!("image reply has no url: {body}")))
}
