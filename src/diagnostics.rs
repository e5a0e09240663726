/// Error formatting for tapec.
/// Provides colorized output and source snippet rendering for parse errors.
use crate::parser::ParseError;

/// Color helpers for terminal output (ANSI escape codes).
fn color_bold_red(s: &str) -> String {
    format!("\x1b[1;31m{}\x1b[0m", s)
}
fn color_bold_yellow(s: &str) -> String {
    format!("\x1b[1;33m{}\x1b[0m", s)
}
fn color_bold_cyan(s: &str) -> String {
    format!("\x1b[1;36m{}\x1b[0m", s)
}
fn color_dim(s: &str) -> String {
    format!("\x1b[2m{}\x1b[0m", s)
}
fn color_gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}

const PARSE_ERROR_CODE: &str = "error[E0001]";

/// Renders the source line `line` with the character at `col` highlighted
/// and a caret underneath. Both are 1-based.
pub fn render_source_snippet(source: &str, line: usize, col: usize) -> Option<String> {
    if line == 0 {
        return None;
    }
    let src_line = source.lines().nth(line - 1)?;

    let gutter = format!("{:>4} {} ", line, color_gray("|"));
    let idx = col.saturating_sub(1);
    let mut highlighted = String::new();
    for (i, ch) in src_line.chars().enumerate() {
        if i == idx {
            highlighted.push_str(&color_bold_cyan(&ch.to_string()));
        } else {
            highlighted.push(ch);
        }
    }

    // gutter is digits + space + '|' + space
    let padding = " ".repeat(4 + 1 + 1 + 1 + idx);
    Some(format!("{}{}\n{}{}", gutter, highlighted, padding, color_bold_red("^")))
}

/// Prints a parse error with its location, a source snippet and a caret.
pub fn print_parse_error_with_source(err: &ParseError, source: &str, filename: &str) {
    let (line, col) = err.location();
    let loc = format!("{}:{}:{}", filename, line, col);
    eprintln!("{} {}", color_bold_red(PARSE_ERROR_CODE), color_dim(&loc));
    eprintln!("{}", err);
    if let Some(snippet) = render_source_snippet(source, line, col) {
        eprintln!("{}", snippet);
    }
    if let ParseError::UnclosedLoop { .. } = err {
        print_note("every '[' needs a matching ']'");
    }
    eprintln!();
}

/// Prints a note (additional info) in yellow.
pub fn print_note(note: &str) {
    eprintln!("{}: {}", color_bold_yellow("note"), note);
}

/// Prints any other error as a single colorized line.
pub fn print_error(err: &dyn std::fmt::Display) {
    eprintln!("{}: {}", color_bold_red("error"), err);
}
