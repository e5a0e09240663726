//! Tree-walking interpreter over the instruction tree, used by
//! `tapec --interpret` and as a reference for the generated code.

pub mod tape;

pub use tape::Tape;

use crate::parser::ast::Instruction;
use std::io::{self, Read, Write};

pub struct Interpreter<R: Read, W: Write> {
    pub tape: Tape,
    input: R,
    output: W,
}

impl<R: Read, W: Write> Interpreter<R, W> {
    pub fn new(tape: Tape, input: R, output: W) -> Self {
        Interpreter {
            tape,
            input,
            output,
        }
    }

    /// Runs `program` to completion and flushes the output.
    pub fn run(&mut self, program: &Instruction) -> io::Result<()> {
        self.execute(program)?;
        self.output.flush()
    }

    fn execute(&mut self, instr: &Instruction) -> io::Result<()> {
        match instr {
            Instruction::Sequence(items) => {
                for item in items {
                    self.execute(item)?;
                }
            }
            Instruction::Loop(body) => {
                while self.tape.get() != 0 {
                    self.execute(body)?;
                }
            }
            Instruction::Increment => self.tape.increment(),
            Instruction::Decrement => self.tape.decrement(),
            Instruction::MoveForward => self.tape.move_forward(),
            Instruction::MoveBackward => self.tape.move_backward(),
            Instruction::Read => {
                let mut byte = [0u8; 1];
                // End of input leaves the cell untouched.
                if self.input.read(&mut byte)? == 1 {
                    self.tape.set(byte[0]);
                }
            }
            Instruction::Write => self.output.write_all(&[self.tape.get()])?,
        }
        Ok(())
    }
}

/// Runs `program` on a fresh tape with the given streams.
pub fn run<R: Read, W: Write>(
    program: &Instruction,
    page_size: usize,
    input: R,
    output: W,
) -> io::Result<Tape> {
    let mut interpreter = Interpreter::new(Tape::new(page_size), input, output);
    interpreter.run(program)?;
    Ok(interpreter.tape)
}

#[cfg(test)]
mod tests;
