//! Lexical path cleaning for the filenames reported in the output.

use std::path::Path;

/// Shortest equivalent form of `path`, computed without touching the file
/// system: `.` elements and repeated or trailing separators are dropped and
/// `..` folds into the preceding element. `..` directly under the root is
/// dropped. An empty result is `.`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// [`clean_path`] for a [`Path`].
pub fn clean_display_path(path: &Path) -> String {
    clean_path(&path.to_string_lossy())
}
