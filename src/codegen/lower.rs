//! Lowering of the instruction tree into `main`.
//!
//! Every operation is appended to the innermost region's open block. Loops
//! are built without placeholder branches: the block that was open before
//! the loop stays unterminated until the loop body is finished, and only
//! then is it closed with a branch to the freshly created `check` block.

use crate::codegen::core::CodeGen;
use crate::error::{CodegenResult, CompileError};
use crate::parser::ast::Instruction;
use inkwell::basic_block::BasicBlock;
use inkwell::values::FunctionValue;
use inkwell::IntPredicate;

impl<'ctx> CodeGen<'ctx> {
    /// Emits the tape runtime and `i32 main(i32, ptr)` for `program`.
    pub fn generate_program(
        &mut self,
        program: &Instruction,
    ) -> CodegenResult<FunctionValue<'ctx>> {
        let runtime = self.init_tape_runtime()?;

        let i32_type = self.context.i32_type();
        let main_type = i32_type.fn_type(&[i32_type.into(), self.ptr_type().into()], false);
        let main = self.module.add_function("main", main_type, None);
        let entry = self.context.append_basic_block(main, "entry");

        self.regions.enter(entry);
        self.builder.position_at_end(entry);
        self.builder.build_call(runtime.init_fn, &[], "")?;

        self.lower(program)?;

        let top = self
            .regions
            .exit()
            .ok_or_else(|| CompileError::Internal("function region already closed".to_string()))?;
        if !self.regions.is_empty() {
            return Err(CompileError::Internal(format!(
                "{} loop region(s) left open",
                self.regions.depth()
            )));
        }

        self.builder.position_at_end(top.tail);
        self.builder.build_return(Some(&i32_type.const_zero()))?;

        Ok(main)
    }

    /// Lowers one instruction into the currently open block.
    pub fn lower(&mut self, instr: &Instruction) -> CodegenResult<()> {
        match instr {
            Instruction::Sequence(items) => {
                for item in items {
                    self.lower(item)?;
                }
                Ok(())
            }
            Instruction::Loop(body) => self.lower_loop(body),
            Instruction::Increment => self.apply_delta_to_current_value(1),
            Instruction::Decrement => self.apply_delta_to_current_value(-1),
            Instruction::MoveForward => self.emit_move(1),
            Instruction::MoveBackward => self.emit_move(-1),
            Instruction::Read => {
                let read = self.runtime()?.read_fn;
                self.position_at_current()?;
                self.builder.build_call(read, &[], "")?;
                Ok(())
            }
            Instruction::Write => {
                let write = self.runtime()?.write_fn;
                self.position_at_current()?;
                self.builder.build_call(write, &[], "")?;
                Ok(())
            }
        }
    }

    /// Opens a region whose first block is appended to the current function.
    pub fn enter_region(&mut self, name: &str) -> CodegenResult<BasicBlock<'ctx>> {
        let function = self.current_function()?;
        let block = self.context.append_basic_block(function, name);
        self.regions.enter(block);
        Ok(block)
    }

    /// Test-before-execute loop:
    ///
    /// ```text
    /// pre_loop ──► check ──(cell == 0)──► escape
    ///                ▲   └─(cell != 0)──► body ... body_end
    ///                └─────────────────────────────┘
    /// ```
    ///
    /// Recurses once per nesting level; the parser caps nesting at
    /// `MAX_LOOP_DEPTH`.
    fn lower_loop(&mut self, body: &Instruction) -> CodegenResult<()> {
        let pre_loop = self.current_block()?;

        self.enter_region("loop.body")?;
        self.lower(body)?;
        let region = self
            .regions
            .exit()
            .ok_or_else(|| CompileError::Internal("loop region missing".to_string()))?;

        let function = self.current_function()?;
        let check = self.context.append_basic_block(function, "loop.check");
        let escape = self.context.append_basic_block(function, "loop.escape");

        self.builder.position_at_end(region.tail);
        self.builder.build_unconditional_branch(check)?;

        self.builder.position_at_end(pre_loop);
        self.builder.build_unconditional_branch(check)?;

        self.builder.position_at_end(check);
        let value = self.current_value()?;
        let is_zero = self.builder.build_int_compare(
            IntPredicate::EQ,
            value,
            self.context.i8_type().const_zero(),
            "is_zero",
        )?;
        self.builder
            .build_conditional_branch(is_zero, escape, region.head)?;

        self.regions.set_tail(escape);
        Ok(())
    }

    /// Adds `delta` to the current cell with 8-bit wraparound.
    fn apply_delta_to_current_value(&mut self, delta: i8) -> CodegenResult<()> {
        self.position_at_current()?;
        let cell = self.current_value_ptr()?;
        let value = self
            .builder
            .build_load(self.context.i8_type(), cell, "value")?
            .into_int_value();
        let step = self.context.i8_type().const_int(delta as u8 as u64, false);
        let updated = self.builder.build_int_add(value, step, "updated")?;
        self.builder.build_store(cell, updated)?;
        Ok(())
    }

    fn emit_move(&mut self, delta: i64) -> CodegenResult<()> {
        let tape_move = self.runtime()?.move_fn;
        self.position_at_current()?;
        self.builder.build_call(
            tape_move,
            &[self.size_type().const_int(delta as u64, true).into()],
            "",
        )?;
        Ok(())
    }
}
