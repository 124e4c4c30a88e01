use crate::bytecode::op::{Op, OpKind, Pc};

/// A verification failure. These indicate compiler bugs, not user errors;
/// the driver treats one as fatal.
#[derive(Debug, PartialEq)]
pub struct CheckError {
    pub pc: Pc,
    pub message: String,
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}: {}", self.pc, self.message)
    }
}

/// Validates a freshly compiled region starting at absolute pc `base`:
/// every branch/jump target must land inside the region and the region must
/// end in Stop.
pub fn check_ops(ops: &[Op], base: Pc) -> Result<(), CheckError> {
    let end = base + ops.len();

    for (i, op) in ops.iter().enumerate() {
        let target = match op.kind {
            OpKind::Branch { false_pc } => Some(false_pc),
            OpKind::Jump { target } => Some(target),
            _ => None,
        };
        if let Some(target) = target {
            if target < base || target > end {
                return Err(CheckError {
                    pc: base + i,
                    message: format!("jump target {} outside [{}, {}]", target, base, end),
                });
            }
        }
    }

    match ops.last() {
        Some(op) if matches!(op.kind, OpKind::Stop) => Ok(()),
        _ => Err(CheckError {
            pc: end,
            message: "missing terminator".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: OpKind) -> Op {
        Op { kind, form: None }
    }

    #[test]
    fn test_accepts_in_range_targets() {
        let ops = [
            op(OpKind::Branch { false_pc: 12 }),
            op(OpKind::Jump { target: 13 }),
            op(OpKind::Nop),
            op(OpKind::Stop),
        ];
        assert_eq!(check_ops(&ops, 10), Ok(()));
    }

    #[test]
    fn test_rejects_out_of_range_target() {
        let ops = [op(OpKind::Jump { target: 3 }), op(OpKind::Stop)];
        let err = check_ops(&ops, 10).unwrap_err();
        assert_eq!(err.pc, 10);
        assert!(err.message.contains("outside"));
    }

    #[test]
    fn test_rejects_missing_terminator() {
        let ops = [op(OpKind::Nop)];
        let err = check_ops(&ops, 0).unwrap_err();
        assert_eq!(err.message, "missing terminator");
    }
}
