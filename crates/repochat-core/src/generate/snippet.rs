/// A generated snippet awaiting review. Accepting inserts `body` directly
/// below the trigger line; rejecting simply drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub trigger_line: String,
    pub body: String,
}

/// Strip surrounding Markdown code-fence markers (optionally language-tagged)
/// and whitespace from a backend answer. Answers without fences are only
/// trimmed.
pub fn strip_code_fences(answer: &str) -> String {
    let trimmed = answer.trim();
    let mut lines: Vec<&str> = trimmed.lines().collect();

    if lines
        .first()
        .is_some_and(|first| first.trim_start().starts_with("```"))
    {
        lines.remove(0);
    }
    if lines.last().is_some_and(|last| last.trim() == "```") {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}

/// Accept action: insert `snippet` on its own lines immediately below the
/// first occurrence of `trigger_line`. Unchanged text is returned when the
/// trigger line is no longer present.
pub fn insert_below(text: &str, trigger_line: &str, snippet: &str) -> String {
    let mut out = String::with_capacity(text.len() + snippet.len() + 1);
    let mut inserted = false;

    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
        if !inserted && line == trigger_line {
            out.push_str(snippet);
            out.push('\n');
            inserted = true;
        }
    }

    if !inserted {
        return text.to_string();
    }
    out
}
