pub mod ast;
pub mod parser;

pub use ast::Instruction;
pub use parser::{parse, ParseError, ParseResult, Parser, MAX_LOOP_DEPTH};

#[cfg(test)]
mod tests;
