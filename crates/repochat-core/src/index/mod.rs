mod throttle;

pub use throttle::{IndexThrottle, REINDEX_INTERVAL};
