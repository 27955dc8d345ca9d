use std::fmt;

/// Source location attached to a diagnostic: filename, 1-indexed line and
/// column, and the offending source line's text (spec.md §4.1's failure
/// model: "every rejection raises a diagnostic carrying (filename, line,
/// column, source line)").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub source_line: String,
}

impl Location {
    pub fn new(
        filename: impl Into<String>,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
            source_line: source_line.into(),
        }
    }

    /// A location with no known source text, for builtin/synthetic nodes.
    pub fn unknown(filename: impl Into<String>) -> Self {
        Self::new(filename, 0, 0, "")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}
