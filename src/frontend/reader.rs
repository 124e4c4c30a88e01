use crate::lang::diag::Diag;
use crate::lang::form::{FormKind, FormList};
use crate::lang::pos::Pos;
use crate::lang::MAX_NAME_LENGTH;
use crate::runtime::vm::Vm;

/// A blocking pull source of characters. `None` means end of input; a source
/// backed by an interactive terminal blocks inside `next_char` until the user
/// supplies more text.
pub trait CharSource {
    fn next_char(&mut self) -> Option<char>;
}

/// An in-memory character source, used by tests and non-interactive shells.
pub struct StrSource {
    chars: Vec<char>,
    at: usize,
}

impl StrSource {
    pub fn new(text: &str) -> Self {
        StrSource {
            chars: text.chars().collect(),
            at: 0,
        }
    }
}

impl CharSource for StrSource {
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.at).copied();
        self.at += 1;
        c
    }
}

/// Reads forms from a character source.
///
/// One `read_form` call tries each sub-reader in fixed order: whitespace,
/// integer, semicolon, group, identifier. A sub-reader either matches and
/// appends one form, restores what it consumed and declines, or fails with a
/// diagnostic. Restoration goes through a small pushback stack; the position
/// advances only when a character is accepted.
pub struct Reader<S> {
    src: S,
    pending: Vec<char>,
    pos: Pos,
}

impl<S: CharSource> Reader<S> {
    pub fn new(src: S, source_name: &str) -> Self {
        Reader {
            src,
            pending: Vec::new(),
            pos: Pos::new(source_name, 0, 0),
        }
    }

    pub fn pos(&self) -> &Pos {
        &self.pos
    }

    fn getc(&mut self) -> Option<char> {
        self.pending.pop().or_else(|| self.src.next_char())
    }

    fn ungetc(&mut self, c: char) {
        self.pending.push(c);
    }

    /// Removes and returns a pushed-back character, if any. The driver uses
    /// this to consume a character no sub-reader accepted.
    pub fn take_pending(&mut self) -> Option<char> {
        self.pending.pop()
    }

    /// Appends the next form to `out`. `Ok(false)` means nothing matched:
    /// the source is exhausted, or the next character belongs to no form.
    pub fn read_form(&mut self, vm: &mut Vm, out: &mut FormList) -> Result<bool, Diag> {
        self.read_ws();
        if self.read_int(vm, out) {
            return Ok(true);
        }
        if self.read_semi(vm, out) {
            return Ok(true);
        }
        if self.read_group(vm, out)? {
            return Ok(true);
        }
        Ok(self.read_id(vm, out))
    }

    fn read_ws(&mut self) {
        loop {
            match self.getc() {
                Some(' ') | Some('\t') => self.pos.column += 1,
                Some('\n') => {
                    self.pos.line += 1;
                    self.pos.column = 0;
                }
                Some(c) => {
                    self.ungetc(c);
                    break;
                }
                None => break,
            }
        }
    }

    fn read_int(&mut self, vm: &mut Vm, out: &mut FormList) -> bool {
        let fpos = self.pos.clone();
        let mut value: i32 = 0;
        let mut neg = false;

        let first = match self.getc() {
            Some(c) => c,
            None => return false,
        };

        if first == '-' {
            match self.getc() {
                Some(d) if d.is_ascii_digit() => {
                    neg = true;
                    self.pos.column += 1;
                    self.ungetc(d);
                }
                Some(other) => {
                    self.ungetc(other);
                    self.ungetc('-');
                    return false;
                }
                None => {
                    self.ungetc('-');
                    return false;
                }
            }
        } else {
            self.ungetc(first);
        }

        let mut digits = 0usize;
        loop {
            match self.getc() {
                Some(d) if d.is_ascii_digit() => {
                    value = value.wrapping_mul(10).wrapping_add((d as u8 - b'0') as i32);
                    digits += 1;
                    self.pos.column += 1;
                }
                Some(other) => {
                    self.ungetc(other);
                    break;
                }
                None => break,
            }
        }

        if digits == 0 {
            return false;
        }

        let lit = vm.int_val(if neg { value.wrapping_neg() } else { value });
        vm.new_form(FormKind::Lit(lit), fpos, Some(out));
        true
    }

    fn read_semi(&mut self, vm: &mut Vm, out: &mut FormList) -> bool {
        let fpos = self.pos.clone();
        match self.getc() {
            Some(';') => {
                self.pos.column += 1;
                vm.new_form(FormKind::Semi, fpos, Some(out));
                true
            }
            Some(c) => {
                self.ungetc(c);
                false
            }
            None => false,
        }
    }

    fn read_group(&mut self, vm: &mut Vm, out: &mut FormList) -> Result<bool, Diag> {
        let fpos = self.pos.clone();
        match self.getc() {
            Some('(') => {}
            Some(c) => {
                self.ungetc(c);
                return Ok(false);
            }
            None => return Ok(false),
        }
        self.pos.column += 1;

        let mut items = FormList::new();
        loop {
            match self.getc() {
                None => return Err(Diag::new(&fpos, "Open group")),
                Some(')') => break,
                Some(c) => {
                    self.ungetc(c);
                    self.read_form(vm, &mut items)?;
                }
            }
        }
        self.pos.column += 1;

        vm.new_form(FormKind::Group(items), fpos, Some(out));
        Ok(true)
    }

    fn read_id(&mut self, vm: &mut Vm, out: &mut FormList) -> bool {
        let fpos = self.pos.clone();
        let mut name = String::new();
        loop {
            match self.getc() {
                None => break,
                Some(c) if c.is_ascii_whitespace() || c == '(' || c == ')' || c == ';' => {
                    self.ungetc(c);
                    break;
                }
                Some(c) => {
                    assert!(name.len() < MAX_NAME_LENGTH, "identifier too long");
                    name.push(c);
                    self.pos.column += 1;
                }
            }
        }

        if name.is_empty() {
            return false;
        }
        vm.new_form(FormKind::Id(name), fpos, Some(out));
        true
    }
}
