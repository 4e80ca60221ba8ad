use crate::backend::Backend;
use crate::error::Result;
use crate::generate::pending::PendingLines;
use crate::generate::snippet::{strip_code_fences, Snippet};
use crate::generate::trigger::detect_trigger;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Turns `generate <description>` comment lines into reviewed snippets.
///
/// Per literal line text there is at most one outstanding request; a line
/// that succeeded stays claimed forever, a failed one is released so the
/// same edit can retrigger.
pub struct InlineGenerator {
    backend: Arc<dyn Backend>,
    pending: Mutex<PendingLines>,
}

impl InlineGenerator {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            pending: Mutex::new(PendingLines::new()),
        }
    }

    /// Run the trigger state machine for one committed line.
    ///
    /// `Ok(None)` means the line is not a trigger or is already claimed;
    /// `Ok(Some(..))` carries the cleaned snippet for review. Errors
    /// propagate after the pending claim has been reversed.
    pub async fn generate(&self, line: &str, root: &Path) -> Result<Option<Snippet>> {
        let Some(description) = detect_trigger(line) else {
            return Ok(None);
        };

        if !self.pending.lock().await.try_claim(line) {
            debug!(line, "trigger already dispatched, skipping");
            return Ok(None);
        }

        match self.backend.chat(description, root).await {
            Ok(reply) => Ok(Some(Snippet {
                trigger_line: line.to_string(),
                body: strip_code_fences(&reply.answer),
            })),
            Err(err) => {
                self.pending.lock().await.release(line);
                Err(err)
            }
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}
