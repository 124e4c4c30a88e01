//! The emit pipeline: draining a form list into the opcode store.
//!
//! Compilation is driven by the forms themselves. Literals and groups compile
//! directly; an identifier resolves to a value whose type decides how the
//! occurrence compiles, which is how functions get their argument prologue
//! and macros get control over the remaining input.

use crate::bytecode::op::OpKind;
use crate::lang::diag::Diag;
use crate::lang::form::{FormId, FormKind, FormList};
use crate::lang::value::Value;
use crate::runtime::vm::Vm;

/// DROP count encoded by an identifier: one or more `d` letters and nothing
/// else. Such names are reserved and never resolve through the environment.
pub fn drop_count(name: &str) -> Option<usize> {
    if !name.is_empty() && name.bytes().all(|b| b == b'd') {
        Some(name.len())
    } else {
        None
    }
}

impl Vm {
    /// Compiles every form in `input`, head first. Each handled form may
    /// consume further forms from the list.
    pub fn emit_forms(&mut self, input: &mut FormList) -> Result<(), Diag> {
        while let Some(form) = input.pop_front() {
            self.form_emit(form, input)?;
        }
        Ok(())
    }

    pub fn form_emit(&mut self, form: FormId, input: &mut FormList) -> Result<(), Diag> {
        let pos = self.form(form).pos.clone();
        let kind = self.form(form).kind.clone();
        match kind {
            FormKind::Group(mut items) => {
                while let Some(child) = items.pop_front() {
                    self.form_emit(child, &mut items)?;
                }
                Ok(())
            }
            FormKind::Id(name) => {
                if let Some(count) = drop_count(&name) {
                    self.emit(OpKind::Drop { count }, Some(form));
                    return Ok(());
                }
                match self.find(&name) {
                    None => Err(Diag::new(&pos, format!("Unknown id: {}", name))),
                    Some(val) => self.val_emit(val, form, input),
                }
            }
            FormKind::Lit(val) => {
                self.emit(OpKind::Push { val }, Some(form));
                Ok(())
            }
            FormKind::Semi => Err(Diag::new(&pos, "Semi emit")),
        }
    }

    /// The compile-time value a form denotes, if any: a literal's value, or
    /// the `lit` projection of an identifier's binding. Groups and semicolons
    /// denote nothing, as do bindings whose type projects to none.
    pub fn form_val(&self, form: FormId) -> Option<Value> {
        match &self.form(form).kind {
            FormKind::Id(name) => self.find(name).and_then(|v| self.val_lit(&v)),
            FormKind::Lit(val) => Some(*val),
            FormKind::Group(_) | FormKind::Semi => None,
        }
    }
}

/// Emit method shared by every type that compiles to "push me".
pub fn default_emit(
    vm: &mut Vm,
    val: Value,
    form: FormId,
    _input: &mut FormList,
) -> Result<(), Diag> {
    vm.emit(OpKind::Push { val }, Some(form));
    Ok(())
}

/// Emit method of the Func type: compile arity-many argument forms from the
/// remaining input, then the call itself.
pub fn func_val_emit(
    vm: &mut Vm,
    val: Value,
    form: FormId,
    input: &mut FormList,
) -> Result<(), Diag> {
    let func = val.as_func();
    let arity = vm.func(func).arity();

    for i in 0..arity {
        let arg = match input.pop_front() {
            Some(f) => f,
            None => {
                let pos = vm.form(form).pos.clone();
                let name = vm.func(func).name.clone();
                return Err(Diag::new(
                    &pos,
                    format!("Missing function arguments: {} {}", name, i),
                ));
            }
        };
        vm.form_emit(arg, input)?;
    }

    vm.emit(OpKind::Call { func }, Some(form));
    Ok(())
}

/// Emit method of the Macro type: check that enough forms remain, then hand
/// the input over to the macro body.
pub fn macro_val_emit(
    vm: &mut Vm,
    val: Value,
    form: FormId,
    input: &mut FormList,
) -> Result<(), Diag> {
    let mac = val.as_macro();
    let arity = vm.macro_def(mac).arity;

    if input.len() < arity {
        let pos = vm.form(form).pos.clone();
        let name = vm.macro_def(mac).name.clone();
        return Err(Diag::new(
            &pos,
            format!("Missing macro arguments: {} {}", name, input.len()),
        ));
    }

    let body = vm.macro_def(mac).body;
    body(vm, mac, form, input)
}
