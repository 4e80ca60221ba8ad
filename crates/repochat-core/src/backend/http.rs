use crate::backend::traits::{Backend, ChatReply};
use crate::error::{RepochatError, Result};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for the indexing backend's two endpoints.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn index(&self, parent_root: &Path) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/index", self.base_url))
            .json(&serde_json::json!({ "parent_root": parent_root }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepochatError::Server {
                status: status.as_u16(),
            });
        }
        // No documented response body for /index.
        Ok(())
    }

    async fn chat(&self, question: &str, parent_root: &Path) -> Result<ChatReply> {
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&serde_json::json!({
                "question": question,
                "parent_root": parent_root,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepochatError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let reply: ChatReply = serde_json::from_str(&body)?;
        Ok(reply)
    }
}
