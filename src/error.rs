use crate::parser::ParseError;
use inkwell::builder::BuilderError;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Every way a compilation can fail. All of them are terminal for the
/// current run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("LLVM builder error: {0}")]
    Builder(#[from] BuilderError),
    #[error("generated module failed verification: {0}")]
    Verify(String),
    #[error("target error: {0}")]
    Target(String),
    #[error("failed to run linker '{linker}': {source}")]
    LinkerSpawn {
        linker: String,
        #[source]
        source: std::io::Error,
    },
    #[error("linker '{linker}' failed with {status}")]
    Link { linker: String, status: ExitStatus },
    #[error("linker reported success but {} was not created", .0.display())]
    MissingOutput(PathBuf),
    #[error("invalid page size {0}: must be greater than zero")]
    InvalidPageSize(u64),
    #[error("internal compiler error: {0}")]
    Internal(String),
}

pub type CodegenResult<T> = Result<T, CompileError>;
