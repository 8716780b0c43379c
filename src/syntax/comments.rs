//! Comments and comment groups.

use crate::loader::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw comment text including the `//` or `/* */` markers
    pub text: String,
    pub pos: Pos,
    pub end: Pos,
}

/// Sequence of comments with no blank line or other token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn new(list: Vec<Comment>) -> Self {
        Self { list }
    }

    pub fn pos(&self) -> Pos {
        self.list.first().map(|c| c.pos).unwrap_or(Pos::NONE)
    }

    pub fn end(&self) -> Pos {
        self.list.last().map(|c| c.end).unwrap_or(Pos::NONE)
    }

    /// Text of the group with comment markers removed.
    ///
    /// Tool directives (`//go:generate`, `//line ...`) are dropped, trailing
    /// whitespace is stripped, leading blank lines are removed and runs of
    /// blank lines collapse to one. Non-empty results end with a newline.
    pub fn text(&self) -> String {
        comments_text(&self.list)
    }
}

/// [`CommentGroup::text`] for a slice of a group.
pub fn comments_text(list: &[Comment]) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for comment in list {
        let raw = comment.text.as_str();
        let body = if let Some(rest) = raw.strip_prefix("//") {
            if let Some(rest) = rest.strip_prefix(' ') {
                rest
            } else if is_directive(rest) {
                continue;
            } else {
                rest
            }
        } else if let Some(rest) = raw.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            raw
        };

        lines.extend(body.split('\n').map(|line| line.trim_end_matches([' ', '\t', '\n', '\r'])));
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let previous_blank = kept.last().is_some_and(|l| l.is_empty());
        if !line.is_empty() || (!kept.is_empty() && !previous_blank) {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        return String::new();
    }
    if kept.last().is_some_and(|l| !l.is_empty()) {
        kept.push("");
    }
    kept.join("\n")
}

/// `line `, `extern `, `export ` or `[a-z0-9]+:[a-z0-9]` after the `//`.
fn is_directive(text: &str) -> bool {
    if text.starts_with("line ") || text.starts_with("extern ") || text.starts_with("export ") {
        return true;
    }

    let bytes = text.as_bytes();
    let colon = match text.find(':') {
        Some(c) if c > 0 && c + 1 < bytes.len() => c,
        _ => return false,
    };
    bytes[..=colon + 1]
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != colon)
        .all(|(_, b)| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(texts: &[&str]) -> CommentGroup {
        CommentGroup::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Comment {
                    text: t.to_string(),
                    pos: Pos(i * 100 + 1),
                    end: Pos(i * 100 + 1 + t.len()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_line_comments() {
        let g = group(&["// Add adds.", "// It is pure."]);
        assert_eq!(g.text(), "Add adds.\nIt is pure.\n");
    }

    #[test]
    fn test_only_one_space_stripped() {
        let g = group(&["//   indented", "//tight"]);
        assert_eq!(g.text(), "  indented\ntight\n");
    }

    #[test]
    fn test_block_comment() {
        let g = group(&["/*\n  Package p does things.\n*/"]);
        assert_eq!(g.text(), "  Package p does things.\n");
    }

    #[test]
    fn test_blank_lines_collapsed() {
        let g = group(&["//", "// First.", "//", "//", "// Second.", "//"]);
        assert_eq!(g.text(), "First.\n\nSecond.\n");
    }

    #[test]
    fn test_directives_dropped() {
        let g = group(&["// Doc.", "//go:generate stringer -type=T", "//line foo.go:1"]);
        assert_eq!(g.text(), "Doc.\n");
    }

    #[test]
    fn test_empty_group_text() {
        assert_eq!(group(&["//"]).text(), "");
        assert_eq!(group(&[]).text(), "");
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("go:embed x"));
        assert!(is_directive("nolint:all"));
        assert!(is_directive("export Foo"));
        assert!(!is_directive("Note: something"));
        assert!(!is_directive(":x"));
        assert!(!is_directive("abc:"));
    }

    #[test]
    fn test_group_range() {
        let g = group(&["// a", "// b"]);
        assert_eq!(g.pos(), Pos(1));
        assert_eq!(g.end(), Pos(105));
    }
}
