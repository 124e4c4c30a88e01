//! Built-in types, constants, functions and macros.
//!
//! `install_types` wires up the five core method tables and the type and
//! constant bindings; it runs as part of interpreter construction.
//! `install` adds the callable surface: native arithmetic, the debug toggle,
//! and the compile-time macros.

use crate::bytecode::compile::{self, drop_count};
use crate::bytecode::op::{OpKind, Pc};
use crate::lang::diag::Diag;
use crate::lang::form::{FormId, FormKind, FormList};
use crate::lang::func::{Func, FuncArg, FuncBody, FuncId, Macro, MacroId};
use crate::lang::pos::Pos;
use crate::lang::value::{Data, Type, Value};
use crate::runtime::vm::Vm;

fn must_bind(vm: &mut Vm, name: &str, val: Value) {
    let fresh = vm.bind(name, val);
    assert!(fresh, "duplicate builtin binding: {}", name);
}

// =============================================================================
// Types
// =============================================================================

pub fn install_types(vm: &mut Vm) {
    let mut meta = Type::new("Meta");
    meta.dump = Some(meta_dump);
    vm.meta_type = vm.add_type(meta);
    let val = vm.type_val(vm.meta_type);
    must_bind(vm, "Meta", val);

    let mut boolean = Type::new("Bool");
    boolean.dump = Some(bool_dump);
    boolean.equal = Some(bool_equal);
    boolean.is_true = bool_true;
    vm.bool_type = vm.add_type(boolean);
    let val = vm.type_val(vm.bool_type);
    must_bind(vm, "Bool", val);
    let val = vm.bool_val(true);
    must_bind(vm, "T", val);
    let val = vm.bool_val(false);
    must_bind(vm, "F", val);

    let mut func = Type::new("Func");
    func.dump = Some(func_dump);
    func.emit = compile::func_val_emit;
    func.lit = func_lit;
    vm.func_type = vm.add_type(func);
    let val = vm.type_val(vm.func_type);
    must_bind(vm, "Func", val);

    let mut int = Type::new("Int");
    int.dump = Some(int_dump);
    int.equal = Some(int_equal);
    int.is_true = int_true;
    vm.int_type = vm.add_type(int);
    let val = vm.type_val(vm.int_type);
    must_bind(vm, "Int", val);

    let mut mac = Type::new("Macro");
    mac.dump = Some(macro_dump);
    mac.emit = compile::macro_val_emit;
    mac.lit = macro_lit;
    vm.macro_type = vm.add_type(mac);
    let val = vm.type_val(vm.macro_type);
    must_bind(vm, "Macro", val);
}

fn bool_dump(_vm: &Vm, val: &Value, out: &mut String) {
    out.push_str(if val.as_bool() { "T" } else { "F" });
}

fn bool_equal(x: &Value, y: &Value) -> bool {
    match (x.data, y.data) {
        (Data::Bool(a), Data::Bool(b)) => a == b,
        _ => false,
    }
}

fn bool_true(val: &Value) -> bool {
    val.as_bool()
}

fn int_dump(_vm: &Vm, val: &Value, out: &mut String) {
    out.push_str(&val.as_int().to_string());
}

fn int_equal(x: &Value, y: &Value) -> bool {
    match (x.data, y.data) {
        (Data::Int(a), Data::Int(b)) => a == b,
        _ => false,
    }
}

fn int_true(val: &Value) -> bool {
    val.as_int() != 0
}

fn meta_dump(vm: &Vm, val: &Value, out: &mut String) {
    out.push_str(vm.type_name(val.as_type()));
}

fn func_dump(vm: &Vm, val: &Value, out: &mut String) {
    out.push_str(&vm.func(val.as_func()).name);
}

fn func_lit(_val: &Value) -> Option<Value> {
    None
}

fn macro_dump(vm: &Vm, val: &Value, out: &mut String) {
    out.push_str("Macro(");
    out.push_str(&vm.macro_def(val.as_macro()).name);
    out.push(')');
}

fn macro_lit(_val: &Value) -> Option<Value> {
    None
}

// =============================================================================
// Functions and macros
// =============================================================================

pub fn install(vm: &mut Vm) {
    let int = vm.int_type;
    let boolean = vm.bool_type;

    let add = vm.new_func(Func::new(
        "+",
        vec![FuncArg::new("x", int), FuncArg::new("y", int)],
        vec![int],
        FuncBody::Native(add_body),
    ));
    let val = vm.func_val(add);
    must_bind(vm, "+", val);

    let debug = vm.new_func(Func::new(
        "debug",
        Vec::new(),
        vec![boolean],
        FuncBody::Native(debug_body),
    ));
    let val = vm.func_val(debug);
    must_bind(vm, "debug", val);

    let equal = vm.new_macro(Macro::new("=", 2, equal_body));
    let val = vm.macro_val(equal);
    must_bind(vm, "=", val);

    let func = vm.new_macro(Macro::new("func", 4, func_body));
    let val = vm.macro_val(func);
    must_bind(vm, "func", val);

    let branch = vm.new_macro(Macro::new("if", 3, if_body));
    let val = vm.macro_val(branch);
    must_bind(vm, "if", val);

    let nop = vm.new_macro(Macro::new("_", 0, nop_body));
    let val = vm.macro_val(nop);
    must_bind(vm, "_", val);

    let sub = vm.new_func(Func::new(
        "-",
        vec![FuncArg::new("x", int), FuncArg::new("y", int)],
        vec![int],
        FuncBody::Native(sub_body),
    ));
    let val = vm.func_val(sub);
    must_bind(vm, "-", val);
}

fn add_body(vm: &mut Vm, _func: FuncId, ret_pc: Pc, pos: &Pos) -> Result<Pc, Diag> {
    let y = vm.pop_val();
    let x = vm.top_val_mut();
    match (&mut x.data, y.data) {
        (Data::Int(a), Data::Int(b)) => *a = a.wrapping_add(b),
        _ => return Err(Diag::new(pos, "Expected Int")),
    }
    Ok(ret_pc)
}

fn sub_body(vm: &mut Vm, _func: FuncId, ret_pc: Pc, pos: &Pos) -> Result<Pc, Diag> {
    let y = vm.pop_val();
    let x = vm.top_val_mut();
    match (&mut x.data, y.data) {
        (Data::Int(a), Data::Int(b)) => *a = a.wrapping_sub(b),
        _ => return Err(Diag::new(pos, "Expected Int")),
    }
    Ok(ret_pc)
}

fn debug_body(vm: &mut Vm, _func: FuncId, ret_pc: Pc, _pos: &Pos) -> Result<Pc, Diag> {
    vm.debug = !vm.debug;
    let val = vm.bool_val(vm.debug);
    vm.push_val(val);
    Ok(ret_pc)
}

/// Detaches the next argument form; a macro that runs dry mid-expansion
/// reports which argument was missing.
fn take_arg(
    vm: &Vm,
    input: &mut FormList,
    form: FormId,
    name: &str,
    index: usize,
) -> Result<FormId, Diag> {
    match input.pop_front() {
        Some(f) => Ok(f),
        None => Err(Diag::new(
            &vm.form(form).pos,
            format!("Missing macro arguments: {} {}", name, index),
        )),
    }
}

fn equal_body(vm: &mut Vm, _mac: MacroId, form: FormId, input: &mut FormList) -> Result<(), Diag> {
    let xf = take_arg(vm, input, form, "=", 0)?;
    let x = vm.form_val(xf);
    if x.is_none() {
        vm.form_emit(xf, input)?;
    }

    let yf = take_arg(vm, input, form, "=", 1)?;
    let y = vm.form_val(yf);
    if y.is_none() {
        vm.form_emit(yf, input)?;
    }

    vm.emit(OpKind::Equal { x, y }, Some(form));
    Ok(())
}

fn if_body(vm: &mut Vm, _mac: MacroId, form: FormId, input: &mut FormList) -> Result<(), Diag> {
    let cond = take_arg(vm, input, form, "if", 0)?;
    vm.form_emit(cond, input)?;
    let branch = vm.emit(OpKind::Branch { false_pc: 0 }, Some(form));

    let truthy = take_arg(vm, input, form, "if", 1)?;
    vm.form_emit(truthy, input)?;
    let jump = vm.emit(OpKind::Jump { target: 0 }, Some(form));

    vm.patch_branch(branch, vm.pc());
    let falsy = take_arg(vm, input, form, "if", 2)?;
    vm.form_emit(falsy, input)?;
    vm.patch_jump(jump, vm.pc());

    Ok(())
}

fn func_body(vm: &mut Vm, _mac: MacroId, form: FormId, input: &mut FormList) -> Result<(), Diag> {
    let name_form = take_arg(vm, input, form, "func", 0)?;
    let name = match &vm.form(name_form).kind {
        FormKind::Id(name) => name.clone(),
        _ => return Err(Diag::new(&vm.form(name_form).pos, "Invalid function name")),
    };
    if drop_count(&name).is_some() {
        return Err(Diag::new(
            &vm.form(name_form).pos,
            format!("Reserved name: {}", name),
        ));
    }

    // arg and ret annotations are read but contribute nothing to the call
    // protocol; arity stays zero
    let _args_form = take_arg(vm, input, form, "func", 1)?;
    let _rets_form = take_arg(vm, input, form, "func", 2)?;
    let func = vm.new_func(Func::new(&name, Vec::new(), Vec::new(), FuncBody::Interp));

    let body_form = take_arg(vm, input, form, "func", 3)?;
    let skip = vm.emit(OpKind::Jump { target: 0 }, Some(body_form));
    vm.set_start_pc(func, vm.pc());
    vm.form_emit(body_form, input)?;
    vm.emit(OpKind::Ret { func }, Some(body_form));
    vm.patch_jump(skip, vm.pc());

    let val = vm.func_val(func);
    if name == "_" {
        vm.push_val(val);
    } else if !vm.bind(&name, val) {
        return Err(Diag::new(
            &vm.form(name_form).pos,
            format!("Duplicate binding: {}", name),
        ));
    }

    Ok(())
}

fn nop_body(_vm: &mut Vm, _mac: MacroId, _form: FormId, _input: &mut FormList) -> Result<(), Diag> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::vm::VmConfig;

    fn vm() -> Vm {
        let mut vm = Vm::new(VmConfig::default());
        install(&mut vm);
        vm
    }

    fn dumped(vm: &Vm, val: Value) -> String {
        let mut out = String::new();
        vm.dump_val(&val, &mut out);
        out
    }

    #[test]
    fn test_builtin_bindings_present() {
        let vm = vm();
        for name in ["Meta", "Bool", "Int", "Func", "Macro", "T", "F", "+", "-", "debug", "=", "if", "func", "_"] {
            assert!(vm.find(name).is_some(), "missing builtin {}", name);
        }
    }

    #[test]
    fn test_dump_methods() {
        let vm = vm();
        assert_eq!(dumped(&vm, vm.int_val(-7)), "-7");
        assert_eq!(dumped(&vm, vm.bool_val(true)), "T");
        assert_eq!(dumped(&vm, vm.bool_val(false)), "F");
        assert_eq!(dumped(&vm, vm.type_val(vm.int_type)), "Int");
        assert_eq!(dumped(&vm, vm.find("+").unwrap()), "+");
        assert_eq!(dumped(&vm, vm.find("=").unwrap()), "Macro(=)");
    }

    #[test]
    fn test_truthiness() {
        let vm = vm();
        assert!(vm.val_true(&vm.int_val(1)));
        assert!(vm.val_true(&vm.int_val(-1)));
        assert!(!vm.val_true(&vm.int_val(0)));
        assert!(vm.val_true(&vm.bool_val(true)));
        assert!(!vm.val_true(&vm.bool_val(false)));
        // anything without an is_true method of its own defaults to true
        assert!(vm.val_true(&vm.type_val(vm.int_type)));
    }

    #[test]
    fn test_equality_within_and_across_payloads() {
        let vm = vm();
        assert!(vm.val_equal(&vm.int_val(3), &vm.int_val(3)));
        assert!(!vm.val_equal(&vm.int_val(3), &vm.int_val(4)));
        assert!(vm.val_equal(&vm.bool_val(true), &vm.bool_val(true)));
        assert!(!vm.val_equal(&vm.int_val(1), &vm.bool_val(true)));
    }

    #[test]
    fn test_literal_projections() {
        let vm = vm();
        let int = vm.int_val(5);
        assert_eq!(vm.val_lit(&int), Some(int));
        assert_eq!(vm.val_lit(&vm.find("+").unwrap()), None);
        assert_eq!(vm.val_lit(&vm.find("if").unwrap()), None);
        let ty = vm.type_val(vm.bool_type);
        assert_eq!(vm.val_lit(&ty), Some(ty));
    }
}
