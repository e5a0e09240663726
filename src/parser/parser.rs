use crate::parser::ast::Instruction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A `]` with no matching `[` before it.
    #[error("unmatched ']' at {line}:{col}")]
    UnmatchedClose { line: usize, col: usize },
    /// A `[` still open when the input ended. Points at the `[`.
    #[error("unclosed '[' opened at {line}:{col}")]
    UnclosedLoop { line: usize, col: usize },
    /// A `[` that would nest deeper than `MAX_LOOP_DEPTH`.
    #[error("loop opened at {line}:{col} nests deeper than {} levels", MAX_LOOP_DEPTH)]
    NestingTooDeep { line: usize, col: usize },
}

impl ParseError {
    /// 1-based (line, column) of the offending bracket.
    pub fn location(&self) -> (usize, usize) {
        match self {
            ParseError::UnmatchedClose { line, col }
            | ParseError::UnclosedLoop { line, col }
            | ParseError::NestingTooDeep { line, col } => (*line, *col),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest loop nesting accepted. Lowering and the tree helpers recurse once
/// per level, so the parser bounds the depth up front.
pub const MAX_LOOP_DEPTH: usize = 1024;

/// Character-level parser. Anything that is not one of the eight command
/// characters is a comment.
pub struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            chars: source.chars().peekable(),
            line: 1,
            col: 0,
        }
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Parses the whole input into a top-level `Sequence`.
    ///
    /// Open loops are kept on an explicit stack of `(position, items)` frames,
    /// so nesting depth never grows the call stack here.
    pub fn parse_program(&mut self) -> ParseResult<Instruction> {
        let mut items = Vec::new();
        let mut open: Vec<((usize, usize), Vec<Instruction>)> = Vec::new();

        while let Some(ch) = self.advance() {
            let instr = match ch {
                '+' => Instruction::Increment,
                '-' => Instruction::Decrement,
                '>' => Instruction::MoveForward,
                '<' => Instruction::MoveBackward,
                ',' => Instruction::Read,
                '.' => Instruction::Write,
                '[' => {
                    let at = (self.line, self.col);
                    if open.len() == MAX_LOOP_DEPTH {
                        return Err(ParseError::NestingTooDeep {
                            line: at.0,
                            col: at.1,
                        });
                    }
                    open.push((at, std::mem::take(&mut items)));
                    continue;
                }
                ']' => match open.pop() {
                    Some((_, outer)) => {
                        let body = std::mem::replace(&mut items, outer);
                        Instruction::looped(body)
                    }
                    None => {
                        return Err(ParseError::UnmatchedClose {
                            line: self.line,
                            col: self.col,
                        })
                    }
                },
                _ => continue,
            };
            items.push(instr);
        }

        match open.pop() {
            Some(((line, col), _)) => Err(ParseError::UnclosedLoop { line, col }),
            None => Ok(Instruction::Sequence(items)),
        }
    }
}

/// Convenience wrapper over `Parser::new(source).parse_program()`.
pub fn parse(source: &str) -> ParseResult<Instruction> {
    Parser::new(source).parse_program()
}
