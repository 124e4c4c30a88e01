use std::collections::VecDeque;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use fibr::frontend::reader::CharSource;
use fibr::repl::{Session, Turn};

/// Pulls characters from line-edited stdin. `next_char` blocks on the editor
/// whenever the buffered line runs out; end of input and interrupt both end
/// the stream.
struct LineSource {
    editor: DefaultEditor,
    buf: VecDeque<char>,
    done: bool,
}

impl LineSource {
    fn new(editor: DefaultEditor) -> Self {
        LineSource {
            editor,
            buf: VecDeque::new(),
            done: false,
        }
    }
}

impl CharSource for LineSource {
    fn next_char(&mut self) -> Option<char> {
        while self.buf.is_empty() {
            if self.done {
                return None;
            }
            match self.editor.readline("") {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    self.buf.extend(line.chars());
                    self.buf.push_back('\n');
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                    self.done = true;
                    return None;
                }
                Err(_) => {
                    self.done = true;
                    return None;
                }
            }
        }
        self.buf.pop_front()
    }
}

fn main() -> Result<()> {
    println!("fibr {}\n", fibr::VERSION);

    let editor = DefaultEditor::new()?;
    let mut session = Session::new(LineSource::new(editor));

    loop {
        match session.turn() {
            Turn::Stack(out) => println!("{}", out),
            Turn::Diag(err) => println!("{}", err),
            Turn::Eof => break,
        }
    }

    Ok(())
}
