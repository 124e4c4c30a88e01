use serde::{Deserialize, Serialize};

use crate::lang::form::FormId;
use crate::lang::func::FuncId;
use crate::lang::value::{RegId, Value};

/// Program counter: index into the flat opcode store.
pub type Pc = usize;

// =============================================================================
// OP - instruction encoding
// =============================================================================
//
// The kind order is stable and indexes the dispatch; Stop stays last.

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum OpKind {
    /// Pop; truthy falls through, falsy jumps to `false_pc`.
    Branch { false_pc: Pc },
    /// Run the function body with return pc one past this op.
    Call { func: FuncId },
    /// Shrink the operand stack by `count`.
    Drop { count: usize },
    /// Push whether x equals y. Unset slots pop at run time, y before x.
    Equal { x: Option<Value>, y: Option<Value> },
    /// Unconditional jump.
    Jump { target: Pc },
    /// Pop into a register.
    Load { reg: RegId },
    Nop,
    /// Push an immediate value.
    Push { val: Value },
    /// Pop the top frame and continue at its saved return pc. The function
    /// reference is informational.
    Ret { func: FuncId },
    /// Push a copy of a register.
    Store { reg: RegId },
    /// The only opcode that halts evaluation successfully.
    Stop,
}

/// One instruction plus the form it was compiled from, for diagnostics and
/// debug traces. Only the terminator a turn appends lacks a source form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Op {
    pub kind: OpKind,
    pub form: Option<FormId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::value::{Data, TypeId};

    #[test]
    fn test_serde_round_trip() {
        let op = Op {
            kind: OpKind::Equal {
                x: Some(Value::new(TypeId(2), Data::Int(3))),
                y: None,
            },
            form: Some(FormId(7)),
        };
        let text = serde_json::to_string(&op).unwrap();
        let back: Op = serde_json::from_str(&text).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_ops_are_plain_data() {
        let op = Op {
            kind: OpKind::Jump { target: 12 },
            form: None,
        };
        let copy = op;
        assert_eq!(copy, op);
    }
}
