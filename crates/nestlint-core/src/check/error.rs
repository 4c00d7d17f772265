//! Error types for the checker.

use miette::Diagnostic;
use thiserror::Error;

use super::delim::matching_closer;

/// A source location (line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Nesting violations reported by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum NestingError {
    /// A closing bracket arrived while no bracket was open.
    #[error("{location}: unexpected closing bracket `{found}`")]
    #[diagnostic(code(nestlint::unexpected_closing))]
    UnexpectedClosing {
        /// The closing bracket that has nothing to match.
        found: char,
        /// Location of the closing bracket.
        location: SourceLocation,
        /// The source line containing the bracket.
        source_line: String,
    },

    /// A closing bracket arrived while the innermost open bracket is of a
    /// different kind.
    #[error("{location}: mismatched closing bracket `{found}`, expected `{expected}`")]
    #[diagnostic(code(nestlint::mismatched_closing))]
    MismatchedClosing {
        /// The closing bracket found in the text.
        found: char,
        /// The closing bracket that would resolve the innermost opener.
        expected: char,
        /// The innermost open bracket at that point.
        open: char,
        /// Location of the closing bracket.
        location: SourceLocation,
        /// The source line containing the bracket.
        source_line: String,
    },

    /// End of input was reached with at least one bracket still open.
    #[error("{location}: unclosed bracket `{open}`")]
    #[diagnostic(code(nestlint::unclosed))]
    Unclosed {
        /// The most recently opened bracket that was never closed.
        open: char,
        /// Location where the bracket was opened.
        location: SourceLocation,
        /// The source line containing the bracket.
        source_line: String,
    },
}

impl NestingError {
    /// Create an unexpected-closing error at a byte offset in `source`.
    pub(crate) fn unexpected_closing(source: &str, offset: usize, found: char) -> Self {
        let location = offset_to_location(source, offset);
        Self::UnexpectedClosing {
            found,
            location,
            source_line: line_at(source, location.line),
        }
    }

    /// Create a mismatched-closing error at a byte offset in `source`.
    pub(crate) fn mismatched_closing(source: &str, offset: usize, found: char, open: char) -> Self {
        let location = offset_to_location(source, offset);
        Self::MismatchedClosing {
            found,
            expected: matching_closer(open).unwrap_or(open),
            open,
            location,
            source_line: line_at(source, location.line),
        }
    }

    /// Create an unclosed-bracket error at the opener's byte offset.
    pub(crate) fn unclosed(source: &str, offset: usize, open: char) -> Self {
        let location = offset_to_location(source, offset);
        Self::Unclosed {
            open,
            location,
            source_line: line_at(source, location.line),
        }
    }

    /// Location of the violation.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        match self {
            Self::UnexpectedClosing { location, .. }
            | Self::MismatchedClosing { location, .. }
            | Self::Unclosed { location, .. } => *location,
        }
    }

    /// Render the violation with source context for display.
    #[must_use]
    pub fn detail(&self) -> String {
        use std::fmt::Write;

        let location = self.location();
        let line = self.source_line();
        let mut output = String::new();

        let _ = writeln!(output, "{self}");
        let _ = writeln!(output, "  |");
        let _ = writeln!(output, "{:>3} | {line}", location.line);
        let _ = writeln!(output, "  | {:>width$}^", "", width = location.column - 1);
        let _ = write!(output, "  = help: {}", self.help_text());

        output
    }

    fn source_line(&self) -> &str {
        match self {
            Self::UnexpectedClosing { source_line, .. }
            | Self::MismatchedClosing { source_line, .. }
            | Self::Unclosed { source_line, .. } => source_line,
        }
    }

    fn help_text(&self) -> String {
        match self {
            Self::UnexpectedClosing { found, .. } => {
                format!("no bracket is open here; remove `{found}` or open a matching bracket first")
            }
            Self::MismatchedClosing { open, expected, .. } => {
                format!("the innermost open bracket is `{open}`; close it with `{expected}` first")
            }
            Self::Unclosed { open, .. } => {
                format!("add `{}` to close it", matching_closer(*open).unwrap_or(*open))
            }
        }
    }
}

/// Extract the 1-indexed line from source for error context.
fn line_at(source: &str, line: usize) -> String {
    source.lines().nth(line - 1).unwrap_or("").to_string()
}

/// Compute line and column from a byte offset in source.
pub(crate) fn offset_to_location(source: &str, offset: usize) -> SourceLocation {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    SourceLocation { line, column: col }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_on_first_line() {
        let loc = offset_to_location("a(b)", 1);
        assert_eq!(loc, SourceLocation { line: 1, column: 2 });
    }

    #[test]
    fn test_offset_after_newline() {
        let loc = offset_to_location("ab\ncd", 3);
        assert_eq!(loc, SourceLocation { line: 2, column: 1 });
    }

    #[test]
    fn test_offset_counts_chars_not_bytes() {
        // 'é' is two bytes but one column
        let loc = offset_to_location("é(", 2);
        assert_eq!(loc, SourceLocation { line: 1, column: 2 });
    }

    #[test]
    fn test_location_display() {
        let loc = SourceLocation { line: 3, column: 7 };
        assert_eq!(loc.to_string(), "3:7");
    }

    #[test]
    fn test_detail_places_caret_under_column() {
        let error = NestingError::unexpected_closing("a)", 1, ')');
        let detail = error.detail();
        assert!(detail.starts_with("1:2: unexpected closing bracket `)`\n"));
        assert!(detail.contains("\n  1 | a)\n"));
        assert!(detail.contains("\n  |  ^\n"));
        assert!(detail.contains("= help:"));
    }

    #[test]
    fn test_unclosed_help_names_the_closer() {
        let error = NestingError::unclosed("1{", 1, '{');
        assert!(error.detail().ends_with("= help: add `}` to close it"));
    }
}
