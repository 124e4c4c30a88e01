use serde::{Deserialize, Serialize};

use crate::lang::MAX_SOURCE_LENGTH;

/// A source location. Captured by the reader before each form and copied by
/// value into forms and diagnostics. Line and column both start at 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub source: String,
    pub line: u16,
    pub column: u16,
}

impl Pos {
    pub fn new(source: &str, line: u16, column: u16) -> Self {
        assert!(source.len() < MAX_SOURCE_LENGTH, "source name too long");
        Pos {
            source: source.to_string(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copied_by_value() {
        let a = Pos::new("repl", 1, 2);
        let mut b = a.clone();
        b.line = 9;
        assert_eq!(a.line, 1);
        assert_eq!(b.line, 9);
    }

    #[test]
    #[should_panic(expected = "source name too long")]
    fn test_source_name_bound_is_fatal() {
        let long = "s".repeat(MAX_SOURCE_LENGTH);
        Pos::new(&long, 0, 0);
    }
}
