/// One node of the instruction tree handed from the front-end to codegen.
/// The tree is built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Sequence(Vec<Instruction>),
    /// Zero-test loop: the body runs while the current cell is non-zero.
    Loop(Box<Instruction>),
    Increment,
    Decrement,
    MoveForward,
    MoveBackward,
    Read,
    Write,
}

impl Instruction {
    /// Builds a loop whose body is the given sequence of instructions.
    pub fn looped(body: Vec<Instruction>) -> Self {
        Instruction::Loop(Box::new(Instruction::Sequence(body)))
    }

    /// Number of operations in the tree. A loop counts as one plus its body;
    /// sequences themselves are free.
    pub fn len(&self) -> usize {
        match self {
            Instruction::Sequence(items) => items.iter().map(Instruction::len).sum(),
            Instruction::Loop(body) => 1 + body.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest loop nesting in the tree (0 for straight-line code).
    pub fn loop_depth(&self) -> usize {
        match self {
            Instruction::Sequence(items) => items
                .iter()
                .map(Instruction::loop_depth)
                .max()
                .unwrap_or(0),
            Instruction::Loop(body) => 1 + body.loop_depth(),
            _ => 0,
        }
    }
}
