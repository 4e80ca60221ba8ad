use std::collections::HashSet;

/// Literal trigger-line texts that have been dispatched for generation.
///
/// An entry is added when the request goes out and removed only on failure,
/// so an unchanged line that already succeeded never fires again while a
/// failed one may be retried by reproducing the same edit.
#[derive(Debug, Default)]
pub struct PendingLines {
    lines: HashSet<String>,
}

impl PendingLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a line for dispatch. False when it is already claimed.
    pub fn try_claim(&mut self, line: &str) -> bool {
        self.lines.insert(line.to_string())
    }

    /// Give the line back after a failed request so it can retrigger.
    pub fn release(&mut self, line: &str) {
        self.lines.remove(line);
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.contains(line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
