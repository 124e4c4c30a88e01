use crate::lang::pos::Pos;

/// A positioned diagnostic. Every stage returns the first failure it hits;
/// the REPL driver prints it and ends the turn without executing.
#[derive(Clone, Debug, PartialEq)]
pub struct Diag {
    pub pos: Pos,
    pub message: String,
}

impl Diag {
    pub fn new(pos: &Pos, message: impl Into<String>) -> Self {
        Diag {
            pos: pos.clone(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error in {}, line {} column {}: {}",
            self.pos.source, self.pos.line, self.pos.column, self.message
        )
    }
}

impl std::error::Error for Diag {}
