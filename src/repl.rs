//! The REPL driver: one turn of read-until-semicolon, compile, verify,
//! evaluate, dump.

use crate::builtins;
use crate::bytecode::check::check_ops;
use crate::bytecode::op::OpKind;
use crate::frontend::reader::{CharSource, Reader};
use crate::lang::diag::Diag;
use crate::lang::form::{FormKind, FormList};
use crate::runtime::vm::{Vm, VmConfig};

/// The outcome of one REPL turn.
#[derive(Debug, PartialEq)]
pub enum Turn {
    /// The turn ran; here is the operand stack dump.
    Stack(String),
    /// The turn failed; here is the formatted diagnostic.
    Diag(String),
    /// The character source is exhausted.
    Eof,
}

/// An interpreter plus a reader over one character source. Bindings, the
/// operand stack and compiled bytecode all persist across turns.
pub struct Session<S> {
    pub vm: Vm,
    reader: Reader<S>,
}

impl<S: CharSource> Session<S> {
    pub fn new(source: S) -> Self {
        let mut vm = Vm::new(VmConfig::default());
        builtins::install(&mut vm);
        Session {
            vm,
            reader: Reader::new(source, "repl"),
        }
    }

    pub fn turn(&mut self) -> Turn {
        let mut forms = FormList::new();

        loop {
            match self.reader.read_form(&mut self.vm, &mut forms) {
                Err(diag) => return Turn::Diag(diag.to_string()),
                Ok(true) => {
                    if let Some(&last) = forms.back() {
                        if matches!(self.vm.form(last).kind, FormKind::Semi) {
                            forms.pop_back();
                            break;
                        }
                    }
                }
                Ok(false) => {
                    // either a character no sub-reader accepts, or end of
                    // input with whatever forms arrived so far
                    if let Some(c) = self.reader.take_pending() {
                        let diag = Diag::new(
                            self.reader.pos(),
                            format!("Unexpected character: '{}'", c),
                        );
                        return Turn::Diag(diag.to_string());
                    }
                    if forms.is_empty() {
                        return Turn::Eof;
                    }
                    break;
                }
            }
        }

        let start = self.vm.pc();
        if let Err(diag) = self.vm.emit_forms(&mut forms) {
            return Turn::Diag(diag.to_string());
        }
        self.vm.emit(OpKind::Stop, None);

        if let Err(err) = check_ops(&self.vm.ops()[start..], start) {
            panic!("bytecode verification failed: {}", err);
        }

        match self.vm.eval(start) {
            Err(diag) => Turn::Diag(diag.to_string()),
            Ok(()) => Turn::Stack(self.vm.dump_stack()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::reader::StrSource;

    fn session(input: &str) -> Session<StrSource> {
        Session::new(StrSource::new(input))
    }

    fn stack(session: &mut Session<StrSource>) -> String {
        match session.turn() {
            Turn::Stack(out) => out,
            other => panic!("expected a stack dump, got {:?}", other),
        }
    }

    fn diag(session: &mut Session<StrSource>) -> String {
        match session.turn() {
            Turn::Diag(out) => out,
            other => panic!("expected a diagnostic, got {:?}", other),
        }
    }

    #[test]
    fn test_turn_addition() {
        let mut s = session("+ 35 7;");
        assert_eq!(stack(&mut s), "[42]");
        assert_eq!(s.turn(), Turn::Eof);
    }

    #[test]
    fn test_unknown_id_position() {
        let mut s = session("foo;");
        assert_eq!(diag(&mut s), "Error in repl, line 0 column 0: Unknown id: foo");
    }

    #[test]
    fn test_end_of_input_runs_pending_forms() {
        let mut s = session("1 2");
        assert_eq!(stack(&mut s), "[1 2]");
        assert_eq!(s.turn(), Turn::Eof);
    }

    #[test]
    fn test_unexpected_character_is_consumed() {
        let mut s = session(") 1;");
        let msg = diag(&mut s);
        assert!(msg.contains("Unexpected character: ')'"), "got {}", msg);
        // the offending character is gone; the session keeps working
        assert_eq!(stack(&mut s), "[1]");
    }

    #[test]
    fn test_empty_input() {
        let mut s = session("");
        assert_eq!(s.turn(), Turn::Eof);
    }

    #[test]
    fn test_failed_turn_keeps_session_alive() {
        let mut s = session("foo;\n+ 1 2;");
        let _ = diag(&mut s);
        assert_eq!(stack(&mut s), "[3]");
    }
}
