use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepochatError {
    #[error("backend returned HTTP {status}")]
    Server { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watcher error: {0}")]
    Watch(String),
}

impl RepochatError {
    /// Transport failures (connection refused, DNS, timeout) as opposed to
    /// a response the backend actually produced.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, RepochatError>;
