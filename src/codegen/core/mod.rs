mod context;
mod helpers;

pub use context::{CodeGen, TapeGlobals, TapeRuntime, DEFAULT_PAGE_SIZE};
pub use helpers::Libc;
