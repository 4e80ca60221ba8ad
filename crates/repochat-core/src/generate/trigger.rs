use regex::Regex;
use std::sync::OnceLock;

static TRIGGER_RE: OnceLock<Regex> = OnceLock::new();

fn trigger_re() -> &'static Regex {
    TRIGGER_RE.get_or_init(|| {
        // `# generate <description>` or `// generate <description>`,
        // case-insensitive. The description must be non-empty.
        Regex::new(r"(?i)^\s*(?:#|//)\s*generate\s+(\S.*?)\s*$").unwrap()
    })
}

/// Pure trigger detection on raw line text. Returns the description when the
/// line is a generate-comment.
pub fn detect_trigger(line: &str) -> Option<&str> {
    trigger_re()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_comment_triggers() {
        assert_eq!(
            detect_trigger("# generate a function that adds two numbers"),
            Some("a function that adds two numbers")
        );
    }

    #[test]
    fn slash_comment_triggers() {
        assert_eq!(
            detect_trigger("// generate a binary search over a sorted vec"),
            Some("a binary search over a sorted vec")
        );
    }

    #[test]
    fn case_and_whitespace_are_forgiven() {
        assert_eq!(
            detect_trigger("   #   GENERATE   parse a csv line   "),
            Some("parse a csv line")
        );
    }

    #[test]
    fn non_triggers_are_ignored() {
        assert_eq!(detect_trigger("generate a thing"), None); // no comment prefix
        assert_eq!(detect_trigger("# generated code below"), None); // not the keyword
        assert_eq!(detect_trigger("# generate"), None); // empty description
        assert_eq!(detect_trigger("let x = 1; // unrelated"), None);
    }
}
