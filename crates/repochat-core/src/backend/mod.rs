mod http;
mod traits;

pub use http::{HttpBackend, DEFAULT_BASE_URL};
pub use traits::{Backend, ChatReply};
