use serde::{Deserialize, Serialize};

use crate::bytecode::op::Pc;
use crate::lang::diag::Diag;
use crate::lang::form::{FormId, FormList};
use crate::lang::pos::Pos;
use crate::lang::value::TypeId;
use crate::lang::MAX_NAME_LENGTH;
use crate::runtime::vm::Vm;

pub const MAX_FUNC_ARG_COUNT: usize = 8;
pub const MAX_FUNC_RET_COUNT: usize = 8;

/// Handle into the interpreter's function pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncId(pub usize);

/// Handle into the interpreter's macro pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroId(pub usize);

/// A native body runs against the current state and returns the next program
/// counter; `pos` is the call site, for diagnostics.
pub type NativeFn = fn(&mut Vm, FuncId, Pc, &Pos) -> Result<Pc, Diag>;

#[derive(Clone, Copy, Debug)]
pub enum FuncBody {
    /// Built into the interpreter; no frame is pushed.
    Native(NativeFn),
    /// Compiled body: push a frame and continue at `start_pc`.
    Interp,
}

#[derive(Clone, Debug)]
pub struct FuncArg {
    pub name: String,
    pub ty: TypeId,
}

impl FuncArg {
    pub fn new(name: &str, ty: TypeId) -> Self {
        FuncArg {
            name: name.to_string(),
            ty,
        }
    }
}

/// A runtime callable. Arity is the length of the argument list; argument
/// and return types are recorded but not checked at call time.
pub struct Func {
    pub name: String,
    pub args: Vec<FuncArg>,
    pub rets: Vec<TypeId>,
    pub body: FuncBody,
    pub start_pc: Option<Pc>,
}

impl Func {
    pub fn new(name: &str, args: Vec<FuncArg>, rets: Vec<TypeId>, body: FuncBody) -> Self {
        assert!(name.len() < MAX_NAME_LENGTH, "function name too long");
        assert!(args.len() <= MAX_FUNC_ARG_COUNT, "too many arguments");
        assert!(rets.len() <= MAX_FUNC_RET_COUNT, "too many returns");
        Func {
            name: name.to_string(),
            args,
            rets,
            body,
            start_pc: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A macro body runs at compile time with the macro's source form and the
/// remaining form list; it emits opcodes and/or consumes forms.
pub type MacroFn = fn(&mut Vm, MacroId, FormId, &mut FormList) -> Result<(), Diag>;

pub struct Macro {
    pub name: String,
    pub arity: usize,
    pub body: MacroFn,
}

impl Macro {
    pub fn new(name: &str, arity: usize, body: MacroFn) -> Self {
        assert!(name.len() < MAX_NAME_LENGTH, "macro name too long");
        Macro {
            name: name.to_string(),
            arity,
            body,
        }
    }
}
