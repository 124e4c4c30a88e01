use crate::bytecode::op::{Op, OpKind, Pc};
use crate::runtime::vm::Vm;

/// Renders one op as a mnemonic line. Jump operands print as zero-padded
/// absolute addresses, values through their type's dump method.
pub fn op_to_string(vm: &Vm, op: &Op) -> String {
    match op.kind {
        OpKind::Branch { false_pc } => format!("BRANCH {:04}", false_pc),
        OpKind::Call { func } => format!("CALL {}", vm.func(func).name),
        OpKind::Drop { count } => format!("DROP {}", count),
        OpKind::Equal { x, y } => {
            let mut out = String::from("EQUAL");
            if let Some(v) = x {
                out.push(' ');
                vm.dump_val(&v, &mut out);
            }
            if let Some(v) = y {
                out.push(' ');
                vm.dump_val(&v, &mut out);
            }
            out
        }
        OpKind::Jump { target } => format!("JUMP {:04}", target),
        OpKind::Load { reg } => format!("LOAD {}", reg),
        OpKind::Nop => "NOP".to_string(),
        OpKind::Push { val } => {
            let mut out = String::from("PUSH ");
            vm.dump_val(&val, &mut out);
            out
        }
        OpKind::Ret { func } => format!("RET {}", vm.func(func).name),
        OpKind::Store { reg } => format!("STORE {}", reg),
        OpKind::Stop => "STOP".to_string(),
    }
}

/// Lists a region of the opcode store, one address-prefixed line per op.
pub fn disassemble(vm: &Vm, start: Pc, end: Pc) -> String {
    let mut out = String::new();
    for pc in start..end {
        out.push_str(&format!("{:04}  {}\n", pc, op_to_string(vm, &vm.ops()[pc])));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::runtime::vm::{Vm, VmConfig};

    fn vm() -> Vm {
        let mut vm = Vm::new(VmConfig::default());
        builtins::install(&mut vm);
        vm
    }

    fn line(vm: &Vm, kind: OpKind) -> String {
        op_to_string(vm, &Op { kind, form: None })
    }

    #[test]
    fn test_mnemonics() {
        let vm = vm();
        let add = vm.find("+").unwrap().as_func();
        assert_eq!(line(&vm, OpKind::Push { val: vm.int_val(42) }), "PUSH 42");
        assert_eq!(line(&vm, OpKind::Call { func: add }), "CALL +");
        assert_eq!(line(&vm, OpKind::Branch { false_pc: 7 }), "BRANCH 0007");
        assert_eq!(line(&vm, OpKind::Drop { count: 2 }), "DROP 2");
        assert_eq!(line(&vm, OpKind::Stop), "STOP");
    }

    #[test]
    fn test_equal_shows_inlined_slots() {
        let vm = vm();
        assert_eq!(
            line(
                &vm,
                OpKind::Equal {
                    x: Some(vm.int_val(3)),
                    y: None,
                }
            ),
            "EQUAL 3"
        );
        assert_eq!(line(&vm, OpKind::Equal { x: None, y: None }), "EQUAL");
    }

    #[test]
    fn test_disassemble_region() {
        let mut vm = vm();
        let start = vm.pc();
        vm.emit(OpKind::Push { val: vm.int_val(1) }, None);
        vm.emit(OpKind::Stop, None);
        let listing = disassemble(&vm, start, vm.pc());
        assert_eq!(listing, "0000  PUSH 1\n0001  STOP\n");
    }
}
