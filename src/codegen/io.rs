use crate::codegen::core::{CodeGen, Libc, TapeGlobals};
use crate::error::CodegenResult;
use inkwell::module::Linkage;
use inkwell::values::FunctionValue;

const STDIN: u64 = 0;
const STDOUT: u64 = 1;

/// Byte I/O bridge between the tape and the standard streams.
impl<'ctx> CodeGen<'ctx> {
    /// `void tape_read()`: reads exactly one byte from stdin into the current
    /// cell. At end of input `read` stores nothing, so the cell keeps its value.
    pub(crate) fn create_tape_read_function(
        &self,
        globals: TapeGlobals<'ctx>,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        self.create_byte_io_function("tape_read", Libc::Read, STDIN, globals)
    }

    /// `void tape_write()`: writes the current cell to stdout.
    pub(crate) fn create_tape_write_function(
        &self,
        globals: TapeGlobals<'ctx>,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        self.create_byte_io_function("tape_write", Libc::Write, STDOUT, globals)
    }

    fn create_byte_io_function(
        &self,
        name: &str,
        syscall: Libc,
        fd: u64,
        globals: TapeGlobals<'ctx>,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        let fn_type = self.context.void_type().fn_type(&[], false);
        let function = self.module.add_function(name, fn_type, None);
        function.set_linkage(Linkage::Private);

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let cell = self.cell_ptr(globals)?;
        let callee = self.get_or_declare_libc(syscall);
        self.builder.build_call(
            callee,
            &[
                self.context.i32_type().const_int(fd, false).into(),
                cell.into(),
                self.size_const(1).into(),
            ],
            "",
        )?;
        self.builder.build_return(None)?;

        Ok(function)
    }
}
