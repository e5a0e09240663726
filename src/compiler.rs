// Compilation pipeline for tapec.
// Reads a source file, parses it into an instruction tree, lowers it into an
// LLVM module, emits a native object file and links it into an executable
// with the system C compiler driver.

use crate::codegen::{CodeGen, DEFAULT_PAGE_SIZE};
use crate::diagnostics::print_parse_error_with_source;
use crate::error::{CodegenResult, CompileError};
use crate::parser::Parser;
use inkwell::context::Context;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine,
};
use inkwell::OptimizationLevel;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Options for controlling the compilation process.
/// These are set by the CLI and control input/output, debug, and build mode.
pub struct CompileOptions {
    /// Path to the source file
    pub input_path: PathBuf,
    /// Path of the executable to produce
    pub output_path: PathBuf,
    /// Tape growth increment in bytes
    pub page_size: u64,
    /// Compiler driver used to link the object file
    pub linker: String,
    /// Enable developer mode (prints progress and the generated IR)
    pub dev_mode: bool,
    /// Print the instruction tree after parsing
    pub print_ast: bool,
    /// Keep the generated LLVM IR (.ll) next to the output
    pub keep_ll: bool,
    /// Keep the generated object (.o) next to the output
    pub keep_obj: bool,
    /// Only parse, do not build
    pub check_only: bool,
}

impl Default for CompileOptions {
    /// Provides default options for compilation.
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("main.b"),
            output_path: PathBuf::from("a.out"),
            page_size: DEFAULT_PAGE_SIZE,
            linker: "clang".to_string(),
            dev_mode: false,
            print_ast: false,
            keep_ll: false,
            keep_obj: false,
            check_only: false,
        }
    }
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// Path to the generated executable (None in check-only mode)
    pub exe_path: Option<PathBuf>,
    /// Number of operations in the parsed program
    pub instruction_count: usize,
}

/// Compiles one source file into a native executable.
/// 1. Reads and parses the source
/// 2. Lowers the instruction tree into an LLVM module and verifies it
/// 3. Emits an object file for the host target
/// 4. Links it with the configured compiler driver
pub fn compile_project(opts: CompileOptions) -> CodegenResult<CompileResult> {
    if opts.page_size == 0 {
        return Err(CompileError::InvalidPageSize(opts.page_size));
    }

    // === 1. Read source code ===
    let source = fs::read_to_string(&opts.input_path).map_err(|source| CompileError::Io {
        path: opts.input_path.clone(),
        source,
    })?;

    // === 2. Parse ===
    let program = match Parser::new(&source).parse_program() {
        Ok(program) => program,
        Err(e) => {
            print_parse_error_with_source(&e, &source, &opts.input_path.display().to_string());
            return Err(e.into());
        }
    };
    let instruction_count = program.len();

    if opts.dev_mode {
        println!(
            "✓ Parsed {} instructions (loop depth {})",
            instruction_count,
            program.loop_depth()
        );
    }
    if opts.print_ast {
        println!("\n=== AST ===\n{:#?}", program);
    }

    if opts.check_only {
        return Ok(CompileResult {
            exe_path: None,
            instruction_count,
        });
    }

    // === 3. Generate LLVM IR ===
    let module_name = opts
        .input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "main".to_string());

    let context = Context::create();
    let mut codegen = CodeGen::with_page_size(&module_name, &context, opts.page_size);
    codegen.generate_program(&program)?;
    codegen
        .module
        .verify()
        .map_err(|e| CompileError::Verify(e.to_string()))?;

    if opts.dev_mode {
        let (major, minor, patch) = llvm_version();
        println!(
            "✓ Generated module '{}' (LLVM {}.{}.{})",
            module_name, major, minor, patch
        );
        println!("\n=== LLVM IR ===");
        codegen.dump();
    }

    if opts.keep_ll {
        let ll_path = opts.output_path.with_extension("ll");
        codegen
            .module
            .print_to_file(&ll_path)
            .map_err(|e| {
                CompileError::Target(format!("failed to write {}: {}", ll_path.display(), e))
            })?;
        if opts.dev_mode {
            println!("✓ LLVM IR written to {}", ll_path.display());
        }
    }

    // === 4. Native compilation and linking ===
    // A stale executable must not pass for the linker's output.
    match fs::remove_file(&opts.output_path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(CompileError::Io {
                path: opts.output_path.clone(),
                source,
            })
        }
    }
    compile_to_native(&codegen, &opts)?;

    if !opts.output_path.exists() {
        return Err(CompileError::MissingOutput(opts.output_path.clone()));
    }
    if opts.dev_mode {
        println!("✓ Executable created at {}", opts.output_path.display());
    }

    Ok(CompileResult {
        exe_path: Some(opts.output_path),
        instruction_count,
    })
}

/// Emits an object file for the host and links it.
/// The object goes to a temporary directory unless keep_obj is set.
fn compile_to_native(codegen: &CodeGen, opts: &CompileOptions) -> CodegenResult<()> {
    // 1. Initialize the native target for codegen
    Target::initialize_native(&InitializationConfig::default())
        .map_err(|e| CompileError::Target(format!("failed to initialize target: {}", e)))?;

    let triple = TargetMachine::get_default_triple();
    let cpu = TargetMachine::get_host_cpu_name().to_string();
    let features = TargetMachine::get_host_cpu_features().to_string();

    let target = Target::from_triple(&triple)
        .map_err(|e| CompileError::Target(format!("failed to create target: {}", e)))?;

    let target_machine = target
        .create_target_machine(
            &triple,
            &cpu,
            &features,
            OptimizationLevel::Default,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| CompileError::Target("failed to create target machine".to_string()))?;

    codegen.module.set_triple(&triple);
    codegen
        .module
        .set_data_layout(&target_machine.get_target_data().get_data_layout());

    // 2. Emit object file
    let temp_dir = tempfile::tempdir().map_err(|source| CompileError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let obj_path = if opts.keep_obj {
        opts.output_path.with_extension("o")
    } else {
        temp_dir.path().join("program.o")
    };

    target_machine
        .write_to_file(&codegen.module, FileType::Object, &obj_path)
        .map_err(|e| CompileError::Target(format!("failed to write object file: {}", e)))?;

    if opts.dev_mode {
        println!("✓ Object file created: {}", obj_path.display());
    }

    // 3. Link object file to native executable
    link_object_file(&opts.linker, &obj_path, &opts.output_path, opts.dev_mode)
}

/// Links the object file with `linker` (a C compiler driver such as clang or
/// cc, which adds the C runtime and startup code). A non-zero exit status is
/// an error.
fn link_object_file(
    linker: &str,
    obj_file: &Path,
    output: &Path,
    dev_mode: bool,
) -> CodegenResult<()> {
    if dev_mode {
        println!("Using {} as linker...", linker);
    }

    let status = Command::new(linker)
        .arg(obj_file)
        .arg("-o")
        .arg(output)
        .status()
        .map_err(|source| CompileError::LinkerSpawn {
            linker: linker.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(CompileError::Link {
            linker: linker.to_string(),
            status,
        });
    }

    if dev_mode {
        println!("✓ Linked successfully with {}", linker);
    }
    Ok(())
}

/// Version of the LLVM library inkwell is linked against.
pub fn llvm_version() -> (u32, u32, u32) {
    let (mut major, mut minor, mut patch) = (0, 0, 0);
    unsafe { llvm_sys::core::LLVMGetVersion(&mut major, &mut minor, &mut patch) };
    (major, minor, patch)
}
