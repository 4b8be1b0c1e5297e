use crate::token::Location;

/// A named source text, with the offsets of each line start so byte offsets
/// can be mapped back to line and column.
#[derive(Debug)]
pub struct SourceFile {
    name: String,
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> SourceFile {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        SourceFile {
            name: name.into(),
            text,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maps a byte offset to its one-based line and column. Columns count
    /// characters, not bytes. Offsets past the end clamp to the end.
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let col = self.text[start..offset].chars().count() + 1;
        Location {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            col: u32::try_from(col).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations() {
        let src = SourceFile::new("a.ll", "ab\n\ncd\nφx");
        let loc = |line, col| Location { line, col };
        assert_eq!(src.location(0), loc(1, 1));
        assert_eq!(src.location(2), loc(1, 3));
        assert_eq!(src.location(3), loc(2, 1));
        assert_eq!(src.location(4), loc(3, 1));
        assert_eq!(src.location(5), loc(3, 2));
        // `φ` is two bytes wide.
        assert_eq!(src.location(9), loc(4, 2));
        assert_eq!(src.location(100), loc(4, 3));
    }
}
