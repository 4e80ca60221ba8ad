use crate::backend::Backend;
use crate::error::Result;
use crate::generate::{InlineGenerator, Snippet};
use crate::index::IndexThrottle;
use crate::session::{SessionHandle, SessionStatus};
use crate::workspace::resolve_workspace_root;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// The orchestration core: owns the throttle map, the pending-line set and
/// the backend handle, constructed once at startup and shared by the event
/// handlers. Every handler isolates its own failure; nothing here is fatal
/// to the process.
pub struct Assistant {
    backend: Arc<dyn Backend>,
    throttle: Mutex<IndexThrottle>,
    generator: InlineGenerator,
    roots: Vec<PathBuf>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn Backend>, roots: Vec<PathBuf>) -> Self {
        Self {
            backend: backend.clone(),
            throttle: Mutex::new(IndexThrottle::new()),
            generator: InlineGenerator::new(backend),
            roots,
        }
    }

    pub fn with_reindex_interval(mut self, interval: Duration) -> Self {
        self.throttle = Mutex::new(IndexThrottle::with_interval(interval));
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// New-file event: index the containing root immediately, bypassing the
    /// throttle. Best-effort; failures are logged and swallowed.
    pub async fn handle_file_created(&self, path: &Path) {
        let Some(root) = resolve_workspace_root(path, &self.roots) else {
            debug!(path = %path.display(), "created file outside any workspace root, ignoring");
            return;
        };

        match self.backend.index(root).await {
            Ok(()) => {
                self.throttle.lock().await.mark_indexed(root, Instant::now());
                debug!(root = %root.display(), "indexed root after file creation");
            }
            Err(err) => {
                warn!(root = %root.display(), %err, "index after file creation failed");
            }
        }
    }

    /// Chat submission: re-index when the throttle window has elapsed, then
    /// forward the question. The session always resolves with an answer
    /// message, error text included.
    pub async fn handle_question(
        &self,
        id: u64,
        question: &str,
        root: &Path,
        session: &SessionHandle,
    ) {
        let needs_index = self
            .throttle
            .lock()
            .await
            .should_reindex(root, Instant::now());

        if needs_index {
            session.status(id, SessionStatus::Indexing);
            match self.backend.index(root).await {
                Ok(()) => {
                    self.throttle.lock().await.mark_indexed(root, Instant::now());
                }
                Err(err) => {
                    // The backend re-ensures its index on /chat anyway, so a
                    // failed pre-index only risks staleness, not wrongness.
                    warn!(root = %root.display(), %err, "re-index before chat failed, continuing");
                }
            }
        }

        session.status(id, SessionStatus::Thinking);
        match self.backend.chat(question, root).await {
            Ok(reply) => session.answer(id, reply.answer),
            Err(err) => {
                error!(%err, "chat request failed");
                session.answer(id, format!("Error: {err}"));
            }
        }
    }

    /// Committed-line event for inline generation.
    pub async fn handle_line(&self, line: &str, root: &Path) -> Result<Option<Snippet>> {
        self.generator.generate(line, root).await
    }
}
