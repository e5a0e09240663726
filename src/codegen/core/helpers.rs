use crate::codegen::core::{CodeGen, TapeGlobals, TapeRuntime};
use crate::error::{CodegenResult, CompileError};
use inkwell::basic_block::BasicBlock;
use inkwell::types::{FunctionType, IntType, PointerType};
use inkwell::values::{FunctionValue, IntValue, PointerValue};
use inkwell::AddressSpace;

/// C library functions the generated program links against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Libc {
    Malloc,
    Realloc,
    Read,
    Write,
    Abort,
}

impl Libc {
    pub fn name(self) -> &'static str {
        match self {
            Libc::Malloc => "malloc",
            Libc::Realloc => "realloc",
            Libc::Read => "read",
            Libc::Write => "write",
            Libc::Abort => "abort",
        }
    }
}

impl<'ctx> CodeGen<'ctx> {
    pub fn ptr_type(&self) -> PointerType<'ctx> {
        self.context.ptr_type(AddressSpace::default())
    }

    /// Sizes and offsets on the tape are 64-bit.
    pub fn size_type(&self) -> IntType<'ctx> {
        self.context.i64_type()
    }

    pub fn size_const(&self, value: u64) -> IntValue<'ctx> {
        self.size_type().const_int(value, false)
    }

    /// The page size as an IR constant.
    pub fn page_const(&self) -> IntValue<'ctx> {
        self.size_const(self.page_size)
    }

    fn libc_type(&self, func: Libc) -> FunctionType<'ctx> {
        let ptr = self.ptr_type();
        let size = self.size_type();
        let fd = self.context.i32_type();

        match func {
            Libc::Malloc => ptr.fn_type(&[size.into()], false),
            Libc::Realloc => ptr.fn_type(&[ptr.into(), size.into()], false),
            Libc::Read | Libc::Write => size.fn_type(&[fd.into(), ptr.into(), size.into()], false),
            Libc::Abort => self.context.void_type().fn_type(&[], false),
        }
    }

    /// Get or declare a C library function.
    pub fn get_or_declare_libc(&self, func: Libc) -> FunctionValue<'ctx> {
        if let Some(f) = self.module.get_function(func.name()) {
            return f;
        }
        self.module
            .add_function(func.name(), self.libc_type(func), None)
    }

    /// Runtime handles, available once `init_tape_runtime` has run.
    pub fn runtime(&self) -> CodegenResult<TapeRuntime<'ctx>> {
        self.runtime
            .ok_or_else(|| CompileError::Internal("tape runtime not initialized".to_string()))
    }

    /// The block currently open for appends: the tail of the innermost region.
    pub fn current_block(&self) -> CodegenResult<BasicBlock<'ctx>> {
        self.regions
            .tail()
            .ok_or_else(|| CompileError::Internal("no open region".to_string()))
    }

    /// Positions the builder at the end of the currently open block.
    pub fn position_at_current(&self) -> CodegenResult<BasicBlock<'ctx>> {
        let block = self.current_block()?;
        self.builder.position_at_end(block);
        Ok(block)
    }

    /// The function that owns the currently open block.
    pub fn current_function(&self) -> CodegenResult<FunctionValue<'ctx>> {
        self.current_block()?
            .get_parent()
            .ok_or_else(|| CompileError::Internal("open block has no parent function".to_string()))
    }

    /// Address of the current cell: `base + cursor`.
    pub fn cell_ptr(&self, globals: TapeGlobals<'ctx>) -> CodegenResult<PointerValue<'ctx>> {
        let base = self
            .builder
            .build_load(self.ptr_type(), globals.base.as_pointer_value(), "base")?
            .into_pointer_value();
        let cursor = self
            .builder
            .build_load(self.size_type(), globals.cursor.as_pointer_value(), "cursor")?
            .into_int_value();

        let cell = unsafe {
            self.builder
                .build_in_bounds_gep(self.context.i8_type(), base, &[cursor], "cell")
        }?;
        Ok(cell)
    }

    pub fn current_value_ptr(&self) -> CodegenResult<PointerValue<'ctx>> {
        self.cell_ptr(self.runtime()?.globals)
    }

    /// Loads the current cell's value as an i8.
    pub fn current_value(&self) -> CodegenResult<IntValue<'ctx>> {
        let cell = self.current_value_ptr()?;
        Ok(self
            .builder
            .build_load(self.context.i8_type(), cell, "value")?
            .into_int_value())
    }
}
