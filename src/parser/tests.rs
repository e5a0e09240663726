#[cfg(test)]
mod parser_tests {
    use crate::parser::ast::Instruction;
    use crate::parser::{parse, ParseError, Parser, MAX_LOOP_DEPTH};

    // --- VALID TESTS ---
    #[test]
    fn test_primitives_map_to_instructions() {
        let program = parse("+-><,.").unwrap();
        assert_eq!(
            program,
            Instruction::Sequence(vec![
                Instruction::Increment,
                Instruction::Decrement,
                Instruction::MoveForward,
                Instruction::MoveBackward,
                Instruction::Read,
                Instruction::Write,
            ])
        );
    }

    #[test]
    fn test_comments_are_ignored() {
        let program = parse("add three: +++ then print .\n").unwrap();
        assert_eq!(
            program,
            Instruction::Sequence(vec![
                Instruction::Increment,
                Instruction::Increment,
                Instruction::Increment,
                Instruction::Write,
            ])
        );
    }

    #[test]
    fn test_empty_program() {
        let program = parse("").unwrap();
        assert_eq!(program, Instruction::Sequence(vec![]));
        assert!(program.is_empty());
    }

    #[test]
    fn test_loop_wraps_body_in_sequence() {
        let program = parse("[-]").unwrap();
        assert_eq!(
            program,
            Instruction::Sequence(vec![Instruction::looped(vec![Instruction::Decrement])])
        );
    }

    #[test]
    fn test_nested_loops() {
        let program = Parser::new("[>[+]<-]").parse_program().unwrap();
        let expected = Instruction::Sequence(vec![Instruction::looped(vec![
            Instruction::MoveForward,
            Instruction::looped(vec![Instruction::Increment]),
            Instruction::MoveBackward,
            Instruction::Decrement,
        ])]);
        assert_eq!(program, expected);
        assert_eq!(program.loop_depth(), 2);
        assert_eq!(program.len(), 6);
    }

    #[test]
    fn test_empty_loop() {
        let program = parse("[]").unwrap();
        assert_eq!(program, Instruction::Sequence(vec![Instruction::looped(vec![])]));
        assert_eq!(program.len(), 1);
    }

    // --- INVALID TESTS ---
    #[test]
    fn test_unmatched_close() {
        let err = parse("+]").unwrap_err();
        assert_eq!(err, ParseError::UnmatchedClose { line: 1, col: 2 });
    }

    #[test]
    fn test_unclosed_loop_points_at_open_bracket() {
        let err = parse("+\n +[[-]").unwrap_err();
        assert_eq!(err, ParseError::UnclosedLoop { line: 2, col: 3 });
        assert_eq!(err.location(), (2, 3));
    }

    #[test]
    fn test_error_messages() {
        let err = parse("]").unwrap_err();
        assert_eq!(err.to_string(), "unmatched ']' at 1:1");
        let err = parse("[").unwrap_err();
        assert_eq!(err.to_string(), "unclosed '[' opened at 1:1");
    }

    #[test]
    fn test_nesting_at_limit_is_accepted() {
        let source = format!("{}{}", "[".repeat(MAX_LOOP_DEPTH), "]".repeat(MAX_LOOP_DEPTH));
        let program = parse(&source).unwrap();
        assert_eq!(program.loop_depth(), MAX_LOOP_DEPTH);
    }

    #[test]
    fn test_nesting_past_limit_is_rejected() {
        let source = format!("+{}", "[".repeat(50_000));
        let err = parse(&source).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                line: 1,
                col: MAX_LOOP_DEPTH + 2,
            }
        );
    }

    #[test]
    fn test_innermost_unclosed_loop_is_reported() {
        let err = parse("[+[").unwrap_err();
        assert_eq!(err, ParseError::UnclosedLoop { line: 1, col: 3 });
    }
}
