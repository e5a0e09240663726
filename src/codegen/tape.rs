//! Tape memory model emitted into the generated module.
//!
//! The tape is a contiguous, zero-filled buffer that grows one page at a
//! time in either direction:
//! - moving past the end reallocates, zeroes the new trailing page and
//!   leaves the cursor alone;
//! - moving before the start reallocates, shifts every existing byte one
//!   page forward, zeroes the vacated leading page and rebases the cursor
//!   by one page so it still names the same logical cell.
//!
//! Allocation failure writes a message to stderr and aborts.

use crate::codegen::core::{CodeGen, Libc, TapeGlobals, TapeRuntime};
use crate::error::{CodegenResult, CompileError};
use inkwell::basic_block::BasicBlock;
use inkwell::module::Linkage;
use inkwell::values::{FunctionValue, GlobalValue, IntValue, PointerValue};
use inkwell::IntPredicate;

const OOM_MESSAGE: &[u8] = b"tape: out of memory\n";

impl<'ctx> CodeGen<'ctx> {
    /// Emits the tape globals and every runtime routine, then records their
    /// handles. Safe to call more than once.
    pub fn init_tape_runtime(&mut self) -> CodegenResult<TapeRuntime<'ctx>> {
        if let Some(runtime) = self.runtime {
            return Ok(runtime);
        }
        if self.page_size == 0 {
            return Err(CompileError::InvalidPageSize(self.page_size));
        }

        let globals = self.create_tape_globals();
        let init_fn = self.create_tape_init_function(globals)?;
        let move_fn = self.create_tape_move_function(globals)?;
        let read_fn = self.create_tape_read_function(globals)?;
        let write_fn = self.create_tape_write_function(globals)?;

        let runtime = TapeRuntime {
            globals,
            init_fn,
            move_fn,
            read_fn,
            write_fn,
        };
        self.runtime = Some(runtime);
        Ok(runtime)
    }

    fn create_tape_globals(&self) -> TapeGlobals<'ctx> {
        let base = self.module.add_global(self.ptr_type(), None, "tape.base");
        base.set_linkage(Linkage::Private);
        base.set_initializer(&self.ptr_type().const_null());

        let capacity = self.module.add_global(self.size_type(), None, "tape.capacity");
        capacity.set_linkage(Linkage::Private);
        capacity.set_initializer(&self.page_const());

        let cursor = self.module.add_global(self.size_type(), None, "tape.cursor");
        cursor.set_linkage(Linkage::Private);
        cursor.set_initializer(&self.size_const(0));

        TapeGlobals {
            base,
            capacity,
            cursor,
        }
    }

    /// `void tape_init()`: base = zeroed page, capacity = P, cursor = 0.
    fn create_tape_init_function(
        &self,
        globals: TapeGlobals<'ctx>,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        let fn_type = self.context.void_type().fn_type(&[], false);
        let function = self.module.add_function("tape_init", fn_type, None);
        function.set_linkage(Linkage::Private);

        let entry = self.context.append_basic_block(function, "entry");
        let ready = self.context.append_basic_block(function, "ready");
        let oom = self.build_oom_block(function)?;

        self.builder.position_at_end(entry);
        let malloc = self.get_or_declare_libc(Libc::Malloc);
        let buffer = self.call_for_pointer(malloc, &[self.page_const().into()], "buffer")?;
        let failed = self.builder.build_is_null(buffer, "failed")?;
        self.builder.build_conditional_branch(failed, oom, ready)?;

        self.builder.position_at_end(ready);
        self.builder
            .build_memset(buffer, 1, self.context.i8_type().const_zero(), self.page_const())?;
        self.builder
            .build_store(globals.base.as_pointer_value(), buffer)?;
        self.builder
            .build_store(globals.capacity.as_pointer_value(), self.page_const())?;
        self.builder
            .build_store(globals.cursor.as_pointer_value(), self.size_const(0))?;
        self.builder.build_return(None)?;

        Ok(function)
    }

    /// `void tape_move(i64 delta)` for delta in {+1, -1}.
    /// A single step can cross at most one page boundary, so each growth
    /// path adds exactly one page.
    fn create_tape_move_function(
        &self,
        globals: TapeGlobals<'ctx>,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        let fn_type = self
            .context
            .void_type()
            .fn_type(&[self.size_type().into()], false);
        let function = self.module.add_function("tape_move", fn_type, None);
        function.set_linkage(Linkage::Private);

        let entry = self.context.append_basic_block(function, "entry");
        let check_backward = self.context.append_basic_block(function, "check.backward");
        let grow_forward = self.context.append_basic_block(function, "grow.forward");
        let grow_backward = self.context.append_basic_block(function, "grow.backward");
        let done = self.context.append_basic_block(function, "done");
        let oom = self.build_oom_block(function)?;

        let delta = function
            .get_nth_param(0)
            .ok_or_else(|| CompileError::Internal("tape_move has no delta".to_string()))?
            .into_int_value();
        let cursor_ptr = globals.cursor.as_pointer_value();
        let capacity_ptr = globals.capacity.as_pointer_value();

        // entry: cursor += delta; past the end?
        self.builder.position_at_end(entry);
        let cursor = self.load_size(globals.cursor, "cursor")?;
        let moved = self.builder.build_int_add(cursor, delta, "moved")?;
        self.builder.build_store(cursor_ptr, moved)?;
        let capacity = self.load_size(globals.capacity, "capacity")?;
        let past_end = self
            .builder
            .build_int_compare(IntPredicate::SGE, moved, capacity, "past_end")?;
        self.builder
            .build_conditional_branch(past_end, grow_forward, check_backward)?;

        // check.backward: before the start?
        self.builder.position_at_end(check_backward);
        let before_start = self.builder.build_int_compare(
            IntPredicate::SLT,
            moved,
            self.size_const(0),
            "before_start",
        )?;
        self.builder
            .build_conditional_branch(before_start, grow_backward, done)?;

        // grow.forward: new page goes at the end, cursor already points into it.
        self.builder.position_at_end(grow_forward);
        let new_capacity = self
            .builder
            .build_int_add(capacity, self.page_const(), "new_capacity")?;
        let grown = self.build_tape_realloc(function, globals, new_capacity, oom, "grow.forward")?;
        let tail_page = unsafe {
            self.builder
                .build_in_bounds_gep(self.context.i8_type(), grown, &[capacity], "tail_page")
        }?;
        self.builder.build_memset(
            tail_page,
            1,
            self.context.i8_type().const_zero(),
            self.page_const(),
        )?;
        self.builder.build_store(capacity_ptr, new_capacity)?;
        self.builder.build_return(None)?;

        // grow.backward: shift old contents up one page before zeroing the front.
        self.builder.position_at_end(grow_backward);
        let new_capacity = self
            .builder
            .build_int_add(capacity, self.page_const(), "new_capacity")?;
        let grown = self.build_tape_realloc(function, globals, new_capacity, oom, "grow.backward")?;
        let shifted = unsafe {
            self.builder.build_in_bounds_gep(
                self.context.i8_type(),
                grown,
                &[self.page_const()],
                "shifted",
            )
        }?;
        self.builder.build_memmove(shifted, 1, grown, 1, capacity)?;
        self.builder.build_memset(
            grown,
            1,
            self.context.i8_type().const_zero(),
            self.page_const(),
        )?;
        self.builder.build_store(capacity_ptr, new_capacity)?;
        let rebased = self
            .builder
            .build_int_add(moved, self.page_const(), "rebased")?;
        self.builder.build_store(cursor_ptr, rebased)?;
        self.builder.build_return(None)?;

        self.builder.position_at_end(done);
        self.builder.build_return(None)?;

        Ok(function)
    }

    /// Reallocates the tape to `new_capacity` bytes. On failure jumps to
    /// `oom`; otherwise stores the new base and leaves the builder in a
    /// fresh `<name>.commit` block.
    fn build_tape_realloc(
        &self,
        function: FunctionValue<'ctx>,
        globals: TapeGlobals<'ctx>,
        new_capacity: IntValue<'ctx>,
        oom: BasicBlock<'ctx>,
        name: &str,
    ) -> CodegenResult<PointerValue<'ctx>> {
        let commit = self
            .context
            .append_basic_block(function, &format!("{}.commit", name));

        let base = self
            .builder
            .build_load(self.ptr_type(), globals.base.as_pointer_value(), "base")?
            .into_pointer_value();
        let realloc = self.get_or_declare_libc(Libc::Realloc);
        let grown = self.call_for_pointer(realloc, &[base.into(), new_capacity.into()], "grown")?;
        let failed = self.builder.build_is_null(grown, "failed")?;
        self.builder.build_conditional_branch(failed, oom, commit)?;

        self.builder.position_at_end(commit);
        self.builder
            .build_store(globals.base.as_pointer_value(), grown)?;
        Ok(grown)
    }

    /// Appends an `oom` block to `function`: report on stderr, then abort.
    fn build_oom_block(&self, function: FunctionValue<'ctx>) -> CodegenResult<BasicBlock<'ctx>> {
        let oom = self.context.append_basic_block(function, "oom");
        self.builder.position_at_end(oom);

        let message = self.oom_message();
        let write = self.get_or_declare_libc(Libc::Write);
        self.builder.build_call(
            write,
            &[
                self.context.i32_type().const_int(2, false).into(),
                message.as_pointer_value().into(),
                self.size_const(OOM_MESSAGE.len() as u64).into(),
            ],
            "",
        )?;
        let abort = self.get_or_declare_libc(Libc::Abort);
        self.builder.build_call(abort, &[], "")?;
        self.builder.build_unreachable()?;

        Ok(oom)
    }

    fn oom_message(&self) -> GlobalValue<'ctx> {
        if let Some(global) = self.module.get_global("tape.oom_message") {
            return global;
        }

        let text = self.context.const_string(OOM_MESSAGE, false);
        let global = self.module.add_global(
            self.context.i8_type().array_type(OOM_MESSAGE.len() as u32),
            None,
            "tape.oom_message",
        );
        global.set_linkage(Linkage::Private);
        global.set_constant(true);
        global.set_initializer(&text);
        global
    }

    fn load_size(&self, global: GlobalValue<'ctx>, name: &str) -> CodegenResult<IntValue<'ctx>> {
        Ok(self
            .builder
            .build_load(self.size_type(), global.as_pointer_value(), name)?
            .into_int_value())
    }

    /// Calls a function returning a pointer and hands back that pointer.
    pub(crate) fn call_for_pointer(
        &self,
        function: FunctionValue<'ctx>,
        args: &[inkwell::values::BasicMetadataValueEnum<'ctx>],
        name: &str,
    ) -> CodegenResult<PointerValue<'ctx>> {
        let call = self.builder.build_call(function, args, name)?;
        call.try_as_basic_value()
            .left()
            .map(|value| value.into_pointer_value())
            .ok_or_else(|| CompileError::Internal(format!("{} returned no value", name)))
    }
}
