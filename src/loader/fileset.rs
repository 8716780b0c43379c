//! Global source positions across all parsed files.
//!
//! Every file added to a [`FileSet`] occupies the offset range
//! `[base, base + size]`; the next file starts one past that range. A [`Pos`]
//! is therefore unique across the whole set and can be mapped back to a
//! `filename:line:column` triple.

use std::fmt;

use serde::Serialize;

/// Offset into a [`FileSet`]. `Pos(0)` means "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Pos(pub usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Resolved source position (1-based line and column).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "-");
        }
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

#[derive(Debug)]
struct SourceFile {
    name: String,
    base: usize,
    size: usize,
    /// Byte offsets of the first character of each line
    lines: Vec<usize>,
}

#[derive(Debug)]
pub struct FileSet {
    base: usize,
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self {
            base: 1,
            files: Vec::new(),
        }
    }

    /// Base that the next added file will receive.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Register a file and return its base offset.
    pub fn add_file(&mut self, name: impl Into<String>, source: &str) -> usize {
        let base = self.base;
        let size = source.len();

        let mut lines = vec![0];
        lines.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(offset, b)| b == b'\n' && offset + 1 < size)
                .map(|(offset, _)| offset + 1),
        );

        self.files.push(SourceFile {
            name: name.into(),
            base,
            size,
            lines,
        });
        self.base = base + size + 1;
        base
    }

    pub fn position(&self, pos: Pos) -> Position {
        if !pos.is_valid() {
            return Position::default();
        }

        let index = self.files.partition_point(|f| f.base <= pos.0);
        if index == 0 {
            return Position::default();
        }
        let file = &self.files[index - 1];
        if pos.0 > file.base + file.size {
            return Position::default();
        }

        let offset = pos.0 - file.base;
        let line = file.lines.partition_point(|&start| start <= offset);
        Position {
            filename: file.name.clone(),
            line,
            column: offset - file.lines[line - 1] + 1,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bases_are_disjoint() {
        let mut fset = FileSet::new();
        let a = fset.add_file("dir/a.go", "package a\n");
        let b = fset.add_file("dir/b.go", "package a\n\nfunc F() {}\n");

        assert_eq!(a, 1);
        assert_eq!(b, 1 + 10 + 1);
        assert_eq!(fset.base(), b + 23 + 1);
        assert_eq!(fset.file_count(), 2);
    }

    #[test]
    fn test_position_lookup() {
        let mut fset = FileSet::new();
        fset.add_file("dir/a.go", "package a\n");
        let base = fset.add_file("dir/b.go", "package a\n\nfunc F() {}\n");

        let pos = fset.position(Pos(base + 11));
        assert_eq!(pos.filename, "dir/b.go");
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 1);

        let pos = fset.position(Pos(base + 16));
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 6);

        let first = fset.position(Pos(1));
        assert_eq!(first.filename, "dir/a.go");
        assert_eq!(first.line, 1);
    }

    #[test]
    fn test_position_invalid() {
        let mut fset = FileSet::new();
        fset.add_file("a.go", "package a");

        assert!(!fset.position(Pos::NONE).is_valid());
        assert!(!fset.position(Pos(500)).is_valid());
        assert_eq!(fset.position(Pos::NONE).to_string(), "-");
    }

    #[test]
    fn test_position_display() {
        let mut fset = FileSet::new();
        fset.add_file("a.go", "package a\nvar X int\n");

        assert_eq!(fset.position(Pos(11)).to_string(), "a.go:2:1");
    }
}
