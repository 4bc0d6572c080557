use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::ChatRequest;

pub const CHAT_PATH: &str = "/chat";

/// One request, one JSON response.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError>;
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint_for(base_url),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint_for(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH)
}

#[async_trait]
impl ChatTransport for ChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        debug!(endpoint = %self.endpoint, "sending chat request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let fallback = format!(
                "Server error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
            .trim_end()
            .to_string();

            // Prefer the server's own explanation when it sends one
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .filter(|message| !message.is_empty())
                .unwrap_or(fallback);

            warn!(status = status.as_u16(), %message, "chat request failed");
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TransportError::InvalidBody(e.to_string()))
    }
}
