pub mod core;
pub mod io;
pub mod lower;
pub mod regions;
pub mod tape;

pub use self::core::{CodeGen, TapeGlobals, TapeRuntime, DEFAULT_PAGE_SIZE};
pub use regions::{Region, RegionStack};
