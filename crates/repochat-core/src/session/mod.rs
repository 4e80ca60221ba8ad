use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

/// Inbound message: panel -> orchestration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: u64,
    pub question: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Indexing,
    Thinking,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Indexing => write!(f, "indexing"),
            SessionStatus::Thinking => write!(f, "thinking"),
        }
    }
}

/// Outbound message: orchestration -> panel. Serializes as `{"id","status"}`
/// for progress and `{"id","answer"}` for the final result. The stream is in
/// order; the panel applies the latest message per id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SessionUpdate {
    Status { id: u64, status: SessionStatus },
    Answer { id: u64, answer: String },
}

impl SessionUpdate {
    pub fn id(&self) -> u64 {
        match self {
            SessionUpdate::Status { id, .. } | SessionUpdate::Answer { id, .. } => *id,
        }
    }
}

/// Sender half of the per-panel channel. Cloneable; sends after the panel is
/// disposed are silently dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionUpdate>,
    last_id: Arc<AtomicU64>,
}

impl SessionHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                last_id: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Id for a new submission: current time in ms, forced strictly
    /// monotonic for submissions within the same millisecond.
    pub fn next_question_id(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut prev = self.last_id.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last_id
                .compare_exchange(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn send(&self, update: SessionUpdate) {
        // The panel may be gone before an in-flight call resolves.
        let _ = self.tx.send(update);
    }

    pub fn status(&self, id: u64, status: SessionStatus) {
        self.send(SessionUpdate::Status { id, status });
    }

    pub fn answer(&self, id: u64, answer: impl Into<String>) {
        self.send(SessionUpdate::Answer {
            id,
            answer: answer.into(),
        });
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
