use serde::{Deserialize, Serialize};

use crate::bytecode::compile;
use crate::lang::diag::Diag;
use crate::lang::form::{FormId, FormList};
use crate::lang::func::{FuncId, MacroId};
use crate::lang::MAX_NAME_LENGTH;
use crate::runtime::vm::Vm;

/// Register index into a state's register file.
pub type RegId = u16;

/// Handle into the interpreter's type registry. Handle equality is type
/// identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeId(pub usize);

/// The closed payload union. Which variant a value carries is dictated by its
/// type; the two always travel together.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Data {
    Bool(bool),
    Int(i32),
    Func(FuncId),
    Macro(MacroId),
    Type(TypeId),
    Reg(RegId),
}

/// A runtime value: a type handle plus a matching payload. Values are `Copy`
/// and flow by value through the operand stack, registers, opcode immediates
/// and environment entries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub ty: TypeId,
    pub data: Data,
}

impl Value {
    pub fn new(ty: TypeId, data: Data) -> Self {
        Value { ty, data }
    }

    pub fn as_bool(&self) -> bool {
        match self.data {
            Data::Bool(b) => b,
            _ => panic!("Bool payload expected"),
        }
    }

    pub fn as_int(&self) -> i32 {
        match self.data {
            Data::Int(i) => i,
            _ => panic!("Int payload expected"),
        }
    }

    pub fn as_func(&self) -> FuncId {
        match self.data {
            Data::Func(f) => f,
            _ => panic!("Func payload expected"),
        }
    }

    pub fn as_macro(&self) -> MacroId {
        match self.data {
            Data::Macro(m) => m,
            _ => panic!("Macro payload expected"),
        }
    }

    pub fn as_type(&self) -> TypeId {
        match self.data {
            Data::Type(t) => t,
            _ => panic!("Type payload expected"),
        }
    }

    pub fn as_reg(&self) -> RegId {
        match self.data {
            Data::Reg(r) => r,
            _ => panic!("Reg payload expected"),
        }
    }
}

pub type DumpFn = fn(&Vm, &Value, &mut String);
pub type EmitFn = fn(&mut Vm, Value, FormId, &mut FormList) -> Result<(), Diag>;
pub type EqualFn = fn(&Value, &Value) -> bool;
pub type IsTrueFn = fn(&Value) -> bool;
pub type LitFn = fn(&Value) -> Option<Value>;

/// Per-type method table. Every operation on a value routes through here.
///
/// `dump` and `equal` have no default and must be provided where used;
/// `emit` defaults to pushing the value as a literal, `is_true` to true, and
/// `lit` to the value itself.
pub struct Type {
    pub name: String,
    pub dump: Option<DumpFn>,
    pub emit: EmitFn,
    pub equal: Option<EqualFn>,
    pub is_true: IsTrueFn,
    pub lit: LitFn,
}

impl Type {
    pub fn new(name: &str) -> Self {
        assert!(name.len() < MAX_NAME_LENGTH, "type name too long");
        Type {
            name: name.to_string(),
            dump: None,
            emit: compile::default_emit,
            equal: None,
            is_true: default_true,
            lit: default_lit,
        }
    }
}

fn default_true(_val: &Value) -> bool {
    true
}

fn default_lit(val: &Value) -> Option<Value> {
    Some(*val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_methods() {
        let ty = Type::new("Thing");
        let val = Value::new(TypeId(0), Data::Int(0));
        assert!((ty.is_true)(&val));
        assert_eq!((ty.lit)(&val), Some(val));
        assert!(ty.dump.is_none());
        assert!(ty.equal.is_none());
    }

    #[test]
    fn test_payload_accessors() {
        let val = Value::new(TypeId(1), Data::Int(-7));
        assert_eq!(val.as_int(), -7);
        let val = Value::new(TypeId(2), Data::Bool(true));
        assert!(val.as_bool());
    }

    #[test]
    #[should_panic(expected = "Int payload expected")]
    fn test_payload_mismatch_is_fatal() {
        Value::new(TypeId(0), Data::Bool(false)).as_int();
    }
}
