//! Builds real executables and runs them with the first C compiler driver
//! found on the host. Without one, each test says so on stderr and returns.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tapec::compiler::{compile_project, CompileOptions};
use tapec::CompileError;

const DRIVERS: &[&str] = &["clang", "cc", "gcc"];

fn find_driver() -> Option<&'static str> {
    DRIVERS.iter().copied().find(|driver| {
        Command::new(driver)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// The driver to link with, or `None` after reporting the skip.
fn driver_or_skip(test: &str) -> Option<&'static str> {
    let driver = find_driver();
    if driver.is_none() {
        eprintln!(
            "skipping {}: no C compiler driver (tried {})",
            test,
            DRIVERS.join(", ")
        );
    }
    driver
}

fn build(source: &str, dir: &Path, page_size: u64, linker: &str) -> PathBuf {
    let input_path = dir.join("program.b");
    std::fs::write(&input_path, source).unwrap();
    let output_path = dir.join("program");

    let result = compile_project(CompileOptions {
        input_path,
        output_path: output_path.clone(),
        page_size,
        linker: linker.to_string(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(result.exe_path.as_deref(), Some(output_path.as_path()));
    output_path
}

fn run(exe: &Path, stdin: &[u8]) -> (i32, Vec<u8>) {
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    // The program may exit without reading everything.
    let _ = child.stdin.take().unwrap().write_all(stdin);
    let output = child.wait_with_output().unwrap();
    (output.status.code().unwrap_or(-1), output.stdout)
}

#[test]
fn e2e_write_three() {
    let Some(linker) = driver_or_skip("e2e_write_three") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let exe = build("+++.", dir.path(), 4096, linker);
    assert_eq!(run(&exe, b""), (0, vec![0x03]));
}

#[test]
fn e2e_echo_one_byte() {
    let Some(linker) = driver_or_skip("e2e_echo_one_byte") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let exe = build(",.", dir.path(), 4096, linker);
    assert_eq!(run(&exe, b"qrs"), (0, b"q".to_vec()));
}

#[test]
fn e2e_read_at_eof_keeps_cell() {
    let Some(linker) = driver_or_skip("e2e_read_at_eof_keeps_cell") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let exe = build("++,.", dir.path(), 4096, linker);
    assert_eq!(run(&exe, b""), (0, vec![2]));
}

#[test]
fn e2e_hello_world_with_tiny_pages() {
    let Some(linker) = driver_or_skip("e2e_hello_world_with_tiny_pages") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let source = std::fs::read_to_string("tests/programs/valid/hello_world.b").unwrap();
    let exe = build(&source, dir.path(), 2, linker);
    assert_eq!(run(&exe, b""), (0, b"Hello World!\n".to_vec()));
}

#[test]
fn e2e_walk_left_of_origin() {
    let Some(linker) = driver_or_skip("e2e_walk_left_of_origin") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let source = std::fs::read_to_string("tests/programs/valid/left_of_origin.b").unwrap();
    let exe = build(&source, dir.path(), 16, linker);
    assert_eq!(run(&exe, b""), (0, b"1".to_vec()));
}

#[test]
fn e2e_keep_ll_writes_ir() {
    let Some(linker) = driver_or_skip("e2e_keep_ll_writes_ir") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("keep.b");
    std::fs::write(&input_path, "+.").unwrap();
    let output_path = dir.path().join("keep");

    compile_project(CompileOptions {
        input_path,
        output_path: output_path.clone(),
        keep_ll: true,
        keep_obj: true,
        linker: linker.to_string(),
        ..Default::default()
    })
    .unwrap();

    let ir = std::fs::read_to_string(dir.path().join("keep.ll")).unwrap();
    assert!(ir.contains("@tape_move"));
    assert!(dir.path().join("keep.o").exists());
}

#[test]
fn e2e_linker_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("fail.b");
    std::fs::write(&input_path, "+").unwrap();

    // `false` exits non-zero without producing anything.
    let err = compile_project(CompileOptions {
        input_path,
        output_path: dir.path().join("fail"),
        linker: "false".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CompileError::Link { .. }));
}

#[test]
fn e2e_missing_linker_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("fail.b");
    std::fs::write(&input_path, "+").unwrap();

    let err = compile_project(CompileOptions {
        input_path,
        output_path: dir.path().join("fail"),
        linker: "tapec-no-such-linker".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CompileError::LinkerSpawn { .. }));
}

#[test]
fn e2e_silent_linker_without_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("quiet.b");
    std::fs::write(&input_path, "+").unwrap();

    // `true` succeeds but never writes the executable.
    let err = compile_project(CompileOptions {
        input_path,
        output_path: dir.path().join("quiet"),
        linker: "true".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CompileError::MissingOutput(_)));
}

#[test]
fn e2e_stale_output_is_not_mistaken_for_a_link() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("stale.b");
    std::fs::write(&input_path, "+").unwrap();
    let output_path = dir.path().join("stale");
    std::fs::write(&output_path, b"left over from an earlier build").unwrap();

    let err = compile_project(CompileOptions {
        input_path,
        output_path: output_path.clone(),
        linker: "true".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CompileError::MissingOutput(_)));
    assert!(!output_path.exists());
}

#[test]
fn e2e_rebuild_replaces_previous_output() {
    let Some(linker) = driver_or_skip("e2e_rebuild_replaces_previous_output") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let first = build("+.", dir.path(), 4096, linker);
    assert_eq!(run(&first, b""), (0, vec![1]));

    let second = build("++.", dir.path(), 4096, linker);
    assert_eq!(first, second);
    assert_eq!(run(&second, b""), (0, vec![2]));
}
