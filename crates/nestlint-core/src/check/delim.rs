//! Delimiter classification for bracket matching.

/// Check if a character opens a bracket pair.
pub(crate) const fn is_opening(ch: char) -> bool {
    matches!(ch, '{' | '[' | '(')
}

/// Check if a character closes a bracket pair.
pub(crate) const fn is_closing(ch: char) -> bool {
    matches!(ch, '}' | ']' | ')')
}

/// The opening bracket a closing bracket must resolve against.
pub(crate) const fn matching_opener(close: char) -> Option<char> {
    match close {
        '}' => Some('{'),
        ']' => Some('['),
        ')' => Some('('),
        _ => None,
    }
}

/// The closing bracket that resolves an opening bracket.
pub(crate) const fn matching_closer(open: char) -> Option<char> {
    match open {
        '{' => Some('}'),
        '[' => Some(']'),
        '(' => Some(')'),
        _ => None,
    }
}
