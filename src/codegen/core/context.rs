use crate::codegen::regions::RegionStack;
use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::Module,
    values::{FunctionValue, GlobalValue},
};

/// Default growth increment of the tape, in bytes.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Handles to the tape's process-wide state inside the generated module.
/// `base` points at the first byte, `capacity` is the allocated length and
/// `cursor` the current offset; the generated code keeps
/// `0 <= cursor < capacity` after every move.
#[derive(Debug, Clone, Copy)]
pub struct TapeGlobals<'ctx> {
    pub base: GlobalValue<'ctx>,
    pub capacity: GlobalValue<'ctx>,
    pub cursor: GlobalValue<'ctx>,
}

/// Runtime routines emitted alongside `main`.
#[derive(Debug, Clone, Copy)]
pub struct TapeRuntime<'ctx> {
    pub globals: TapeGlobals<'ctx>,
    /// `void tape_init()`: allocates the first zeroed page.
    pub init_fn: FunctionValue<'ctx>,
    /// `void tape_move(i64 delta)`: moves the cursor by +1/-1, growing the tape.
    pub move_fn: FunctionValue<'ctx>,
    /// `void tape_read()`: reads one byte from stdin into the current cell.
    pub read_fn: FunctionValue<'ctx>,
    /// `void tape_write()`: writes the current cell to stdout.
    pub write_fn: FunctionValue<'ctx>,
}

/// The generation context threaded through the lowering pass.
/// It owns the LLVM module being built, the single builder, and the
/// region stack that tracks which block is currently open for appends.
pub struct CodeGen<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>, // The container for all generated code (globals, functions, types)
    pub builder: Builder<'ctx>, // The tool used to insert instructions into blocks
    pub page_size: u64,
    pub runtime: Option<TapeRuntime<'ctx>>, // Filled by init_tape_runtime
    pub regions: RegionStack<BasicBlock<'ctx>>,
}

impl<'ctx> CodeGen<'ctx> {
    /// Creates a new CodeGen instance with the default page size.
    pub fn new(module_name: &str, context: &'ctx Context) -> Self {
        Self::with_page_size(module_name, context, DEFAULT_PAGE_SIZE)
    }

    /// Creates a new CodeGen instance whose tape grows by `page_size` bytes.
    pub fn with_page_size(module_name: &str, context: &'ctx Context, page_size: u64) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        Self {
            context,
            module,
            builder,
            page_size,
            runtime: None,
            regions: RegionStack::new(),
        }
    }

    /// Prints the final generated LLVM IR to standard error (stderr).
    pub fn dump(&self) {
        self.module.print_to_stderr();
    }

    /// Textual LLVM IR of the module built so far.
    pub fn ir(&self) -> String {
        self.module.print_to_string().to_string()
    }
}
