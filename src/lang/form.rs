use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::lang::pos::Pos;
use crate::lang::value::Value;

/// Handle into the interpreter's form arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormId(pub usize);

/// The working list the compiler drains and macros splice. Holding handles
/// instead of forms keeps consuming and re-queueing cheap.
pub type FormList = VecDeque<FormId>;

/// A parsed source element.
#[derive(Clone, Debug, PartialEq)]
pub enum FormKind {
    /// `( … )` — sequencing only; the compiler drains the children in order.
    Group(FormList),
    /// A name to resolve at compile time.
    Id(String),
    /// A value read directly from source.
    Lit(Value),
    /// The `;` turn terminator.
    Semi,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    pub kind: FormKind,
    pub pos: Pos,
}
