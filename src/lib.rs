// tapec compiler library
// Exports all compiler modules for testing and external use

pub mod codegen;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod parser;

// Re-export commonly used types
pub use codegen::CodeGen;
pub use compiler::{compile_project, CompileOptions, CompileResult};
pub use error::CompileError;
pub use parser::ast::Instruction;
pub use parser::{parse, ParseError, Parser};
