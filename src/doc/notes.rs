//! `MARKER(uid): body` annotations in comments.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::syntax::comments::comments_text;
use crate::syntax::{Comment, CommentGroup};

use super::Note;

/// Marker at the start of a comment's raw text.
pub static NOTE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[/*][ \t]*([A-Z][A-Z]+)\(([^)]+)\):?").unwrap());

/// Marker at the start of extracted comment text.
pub static NOTE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*([A-Z][A-Z]+)\(([^)]+)\):?").unwrap());

/// Collect the notes of every group into `notes`, keyed by marker.
///
/// A note starts at a comment beginning with a marker and runs until the
/// next such comment or the end of the group.
pub fn read_notes(groups: &[CommentGroup], notes: &mut BTreeMap<String, Vec<Note>>) {
    for group in groups {
        let list = &group.list;
        let mut start: Option<usize> = None;
        for (i, comment) in list.iter().enumerate() {
            if NOTE_COMMENT_RE.is_match(&comment.text) {
                if let Some(s) = start {
                    read_note(&list[s..i], notes);
                }
                start = Some(i);
            }
        }
        if let Some(s) = start {
            read_note(&list[s..], notes);
        }
    }
}

fn read_note(list: &[Comment], notes: &mut BTreeMap<String, Vec<Note>>) {
    let (Some(first), Some(last)) = (list.first(), list.last()) else {
        return;
    };
    let text = comments_text(list);
    let Some(caps) = NOTE_MARKER_RE.captures(&text) else {
        return;
    };
    let (Some(whole), Some(marker), Some(uid)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return;
    };

    let body = clean_note_body(&text[whole.end()..]);
    if body.is_empty() {
        return;
    }

    notes.entry(marker.as_str().to_string()).or_default().push(Note {
        pos: first.pos,
        end: last.end,
        uid: uid.as_str().to_string(),
        body,
    });
}

/// Collapse runs of blanks, turn tabs and carriage returns into blanks and
/// drop leading blanks and a trailing one. Newlines are kept.
pub fn clean_note_body(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = ' ';
    for c in s.chars() {
        let c = if c == '\t' || c == '\r' { ' ' } else { c };
        if c != ' ' || prev != ' ' {
            out.push(c);
            prev = c;
        }
    }
    if prev == ' ' {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Pos;

    fn group(texts: &[&str], start: usize) -> CommentGroup {
        let mut pos = start;
        let list = texts
            .iter()
            .map(|t| {
                let c = Comment {
                    text: t.to_string(),
                    pos: Pos(pos),
                    end: Pos(pos + t.len()),
                };
                pos += t.len() + 1;
                c
            })
            .collect();
        CommentGroup::new(list)
    }

    #[test]
    fn test_single_note() {
        let mut notes = BTreeMap::new();
        read_notes(&[group(&["// BUG(rsc): this is broken."], 10)], &mut notes);

        let bugs = &notes["BUG"];
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].uid, "rsc");
        assert_eq!(bugs[0].body, "this is broken.\n");
        assert_eq!(bugs[0].pos, Pos(10));
        assert_eq!(bugs[0].end, Pos(10 + "// BUG(rsc): this is broken.".len()));
    }

    #[test]
    fn test_note_spans_until_next_marker() {
        let mut notes = BTreeMap::new();
        let g = group(
            &["// TODO(a): first", "// continued", "// NOTE(b):   second\tpart"],
            1,
        );
        read_notes(&[g.clone()], &mut notes);

        assert_eq!(notes["TODO"][0].body, "first\ncontinued\n");
        assert_eq!(notes["TODO"][0].end, g.list[1].end);
        assert_eq!(notes["NOTE"][0].uid, "b");
        assert_eq!(notes["NOTE"][0].body, "second part\n");
    }

    #[test]
    fn test_marker_must_start_comment() {
        let mut notes = BTreeMap::new();
        read_notes(&[group(&["// see BUG(x): not a note", "// X(y): one letter"], 1)], &mut notes);

        assert!(notes.is_empty());
    }

    #[test]
    fn test_empty_body_skipped() {
        let mut notes = BTreeMap::new();
        read_notes(&[group(&["// TODO(x):"], 1)], &mut notes);

        assert!(notes.is_empty());
    }

    #[test]
    fn test_block_comment_marker() {
        let mut notes = BTreeMap::new();
        read_notes(&[group(&["/* HACK(me): works for now */"], 1)], &mut notes);

        assert_eq!(notes["HACK"][0].body, "works for now\n");
    }

    #[test]
    fn test_clean_note_body() {
        assert_eq!(clean_note_body("  a \t b  "), "a b");
        assert_eq!(clean_note_body(" x\n  y\n"), "x\n y\n");
        assert_eq!(clean_note_body(""), "");
    }
}
