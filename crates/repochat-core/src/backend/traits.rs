use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Reply from the backend's `/chat` endpoint.
///
/// A reply without an `answer` field is a deserialization error by design:
/// rendering a missing field as literal text helps nobody.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    /// Retrieved snippets the backend grounded the answer on.
    #[serde(default)]
    pub context: Vec<String>,
}

/// The indexing/chat backend seam. Implementations never retry on their own;
/// callers decide whether a failure is surfaced or swallowed.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Ask the backend to (re)index everything under `parent_root`.
    async fn index(&self, parent_root: &Path) -> Result<()>;

    /// Ask a question scoped to `parent_root`.
    async fn chat(&self, question: &str, parent_root: &Path) -> Result<ChatReply>;
}
