//! Bracket nesting checker.
//!
//! The checker makes a single left-to-right pass over the text, pushing
//! opening brackets onto a stack and resolving each closing bracket against
//! the most recently opened one. Characters outside the three ASCII bracket
//! pairs are inert, so arbitrary prose can surround the brackets.

mod delim;
mod error;

pub use error::{NestingError, SourceLocation};

use delim::{is_closing, is_opening, matching_opener};

/// An opening bracket still waiting for its closer.
#[derive(Debug, Clone, Copy)]
struct OpenBracket {
    bracket: char,
    offset: usize,
}

/// Check whether brackets in `text` are correctly nested.
///
/// Every closing bracket must resolve the most recently opened bracket of
/// the matching kind, and nothing may be left open at the end. Text without
/// any brackets (including the empty string) is balanced.
#[must_use]
pub fn check_nesting(text: &str) -> bool {
    check_source(text).is_ok()
}

/// Validate bracket nesting, reporting the first violation.
///
/// # Errors
///
/// Returns an error when a closing bracket arrives with nothing open, when
/// a closing bracket does not match the innermost open bracket, or when the
/// end of input is reached with a bracket still open.
pub fn check_source(text: &str) -> Result<(), NestingError> {
    let mut stack: Vec<OpenBracket> = Vec::new();

    for (offset, ch) in text.char_indices() {
        if is_opening(ch) {
            stack.push(OpenBracket { bracket: ch, offset });
        } else if let Some(required) = matching_opener(ch) {
            let Some(top) = stack.last().copied() else {
                return Err(NestingError::unexpected_closing(text, offset, ch));
            };
            if top.bracket == required {
                stack.pop();
            } else {
                return Err(NestingError::mismatched_closing(
                    text,
                    offset,
                    ch,
                    top.bracket,
                ));
            }
        }
    }

    match stack.pop() {
        Some(open) => Err(NestingError::unclosed(text, open.offset, open.bracket)),
        None => Ok(()),
    }
}

/// Debug scan output showing every bracket event in `text`.
///
/// Unlike [`check_source`], the scan does not stop at the first violation:
/// the verdict is fixed at that point either way, and the trace is more
/// useful when it reports everything it saw.
#[must_use]
pub fn debug_scan(text: &str) -> String {
    use std::fmt::Write;

    let mut output = format!("Source: {text:?} (len={})\n\nEvents:\n", text.len());
    let mut stack: Vec<OpenBracket> = Vec::new();
    let mut max_depth = 0;

    for (offset, ch) in text.char_indices() {
        if is_opening(ch) {
            stack.push(OpenBracket { bracket: ch, offset });
            max_depth = max_depth.max(stack.len());
            let _ = writeln!(output, "  OPEN {ch:?} at {offset} (depth {})", stack.len());
        } else if is_closing(ch) {
            match stack.last().copied() {
                None => {
                    let _ = writeln!(output, "  STRAY {ch:?} at {offset}");
                }
                Some(top) if matching_opener(ch) == Some(top.bracket) => {
                    stack.pop();
                    let _ = writeln!(output, "  CLOSE {ch:?} at {offset} (depth {})", stack.len());
                }
                Some(top) => {
                    let _ = writeln!(
                        output,
                        "  MISMATCH {ch:?} at {offset} (innermost open {:?})",
                        top.bracket
                    );
                }
            }
        }
    }

    for open in stack.iter().rev() {
        let _ = writeln!(output, "  UNCLOSED {:?} at {}", open.bracket, open.offset);
    }

    let _ = write!(output, "\nMax depth: {max_depth}");
    output
}
