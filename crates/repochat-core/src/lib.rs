pub mod assistant;
pub mod backend;
pub mod config;
pub mod error;
pub mod generate;
pub mod index;
pub mod session;
pub mod watch;
pub mod workspace;

// Re-export key types
pub use assistant::Assistant;
pub use backend::{Backend, ChatReply, HttpBackend};
pub use config::Settings;
pub use error::{RepochatError, Result};
pub use generate::{detect_trigger, insert_below, strip_code_fences, InlineGenerator, Snippet};
pub use index::IndexThrottle;
pub use session::{Question, SessionHandle, SessionStatus, SessionUpdate};
pub use watch::WorkspaceWatcher;
pub use workspace::resolve_workspace_root;
