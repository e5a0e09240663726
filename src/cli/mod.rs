use clap::Parser;
use std::path::PathBuf;

/// CLI definition for the tapec compiler.
#[derive(Parser, Debug)]
#[command(name = "tapec")]
#[command(about = "Compiles tape-machine programs to native executables")]
#[command(version)]
pub struct Cli {
    /// Source file to compile
    pub input: PathBuf,

    /// Path of the executable to produce
    #[arg(default_value = "a.out")]
    pub output: PathBuf,

    /// Tape growth increment in bytes
    #[arg(long, default_value_t = tapec::codegen::DEFAULT_PAGE_SIZE)]
    pub page_size: u64,

    /// C compiler driver used to link the object file
    #[arg(long, default_value = "clang")]
    pub linker: String,

    /// Keep the generated LLVM IR (.ll) file
    #[arg(long)]
    pub keep_ll: bool,

    /// Keep the generated object (.o) file
    #[arg(long)]
    pub keep_obj: bool,

    /// Check for errors without compiling
    #[arg(long)]
    pub check: bool,

    /// Print the parsed instruction tree
    #[arg(long)]
    pub print_ast: bool,

    /// Print progress and the generated IR
    #[arg(long)]
    pub dev: bool,

    /// Run the program with the built-in interpreter instead of compiling
    #[arg(long, conflicts_with = "check")]
    pub interpret: bool,
}

/// Entrypoint for CLI logic.
/// Returns exit code (0 for success, nonzero for error).
pub fn run_cli(cli: Cli) -> i32 {
    use tapec::compiler::{compile_project, CompileOptions};
    use tapec::diagnostics::print_error;

    if cli.interpret {
        return interpret(&cli);
    }

    let opts = CompileOptions {
        input_path: cli.input,
        output_path: cli.output,
        page_size: cli.page_size,
        linker: cli.linker,
        dev_mode: cli.dev,
        print_ast: cli.print_ast,
        keep_ll: cli.keep_ll,
        keep_obj: cli.keep_obj,
        check_only: cli.check,
    };
    let check_only = opts.check_only;

    match compile_project(opts) {
        Ok(result) => {
            match result.exe_path {
                Some(path) => println!("✓ Build successful: {}", path.display()),
                None if check_only => println!("✓ No errors found"),
                None => {}
            }
            0
        }
        // Parse errors were already rendered with their source snippet.
        Err(tapec::CompileError::Parse(_)) => 1,
        Err(e) => {
            print_error(&e);
            1
        }
    }
}

fn interpret(cli: &Cli) -> i32 {
    use std::io::{stdin, stdout};
    use tapec::diagnostics::{print_error, print_parse_error_with_source};

    if cli.page_size == 0 {
        print_error(&tapec::CompileError::InvalidPageSize(0));
        return 1;
    }

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(source) => {
            print_error(&tapec::CompileError::Io {
                path: cli.input.clone(),
                source,
            });
            return 1;
        }
    };

    let program = match tapec::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            print_parse_error_with_source(&e, &source, &cli.input.display().to_string());
            return 1;
        }
    };

    match tapec::interpreter::run(&program, cli.page_size as usize, stdin().lock(), stdout().lock()) {
        Ok(_) => 0,
        Err(e) => {
            print_error(&e);
            1
        }
    }
}
