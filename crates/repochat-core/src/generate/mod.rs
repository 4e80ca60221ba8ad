mod generator;
mod pending;
mod snippet;
mod trigger;

pub use generator::InlineGenerator;
pub use pending::PendingLines;
pub use snippet::{insert_below, strip_code_fences, Snippet};
pub use trigger::detect_trigger;
