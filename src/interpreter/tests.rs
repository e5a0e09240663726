#[cfg(test)]
mod interpreter_tests {
    use crate::interpreter::{run, Tape};
    use crate::parser::ast::Instruction;
    use crate::parser::parse;

    fn run_source(source: &str, input: &[u8]) -> (Vec<u8>, Tape) {
        let program = parse(source).unwrap();
        let mut output = Vec::new();
        let tape = run(&program, 16, input, &mut output).unwrap();
        (output, tape)
    }

    // =====================
    // Tape growth
    // =====================

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut tape = Tape::new(4);
        let moves = [1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, 1, -1, -1, -1, -1, -1];
        for delta in moves {
            tape.move_by(delta);
            assert!(tape.cursor() < tape.capacity());
            assert_eq!(tape.capacity() % tape.page_size(), 0);
            assert!(tape.capacity() > 0);
        }
    }

    #[test]
    fn test_forward_growth_happens_once_per_page() {
        let mut tape = Tape::new(8);
        for step in 1..=9 {
            tape.move_forward();
            let expected = if step < 8 { 0 } else { 1 };
            assert_eq!(tape.growth_count(), expected, "after step {}", step);
        }
        assert_eq!(tape.capacity(), 16);
        assert_eq!(tape.cursor(), 9);
    }

    #[test]
    fn test_backward_growth_preserves_content() {
        let mut tape = Tape::new(4);
        tape.set(0xAB);
        tape.move_forward();
        tape.set(0xCD);
        tape.move_backward();

        tape.move_backward();
        assert_eq!(tape.growth_count(), 1);
        assert_eq!(tape.capacity(), 8);
        assert_eq!(tape.cursor(), 3);
        assert_eq!(tape.get(), 0);
        assert_eq!(&tape.as_slice()[..4], &[0, 0, 0, 0]);

        tape.move_forward();
        assert_eq!(tape.get(), 0xAB);
        tape.move_forward();
        assert_eq!(tape.get(), 0xCD);
    }

    #[test]
    #[should_panic(expected = "single steps")]
    fn test_multi_step_move_is_rejected() {
        Tape::new(4).move_by(2);
    }

    // =====================
    // Cell arithmetic
    // =====================

    #[test]
    fn test_increment_wraps_to_zero() {
        let (_, tape) = run_source(&"+".repeat(256), b"");
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn test_decrement_wraps_to_255() {
        let (_, tape) = run_source("-", b"");
        assert_eq!(tape.get(), 255);
    }

    // =====================
    // Control flow and I/O
    // =====================

    #[test]
    fn test_loop_skipped_when_cell_zero() {
        let program = Instruction::Sequence(vec![Instruction::looped(vec![Instruction::Increment])]);
        let tape = run(&program, 4, &b""[..], Vec::new()).unwrap();
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn test_write_three() {
        let (output, _) = run_source("+++.", b"");
        assert_eq!(output, vec![0x03]);
    }

    #[test]
    fn test_echo_one_byte() {
        let (output, _) = run_source(",.", b"xyz");
        assert_eq!(output, b"x".to_vec());
    }

    #[test]
    fn test_read_at_eof_keeps_cell() {
        let (output, _) = run_source("+++++,.", b"");
        assert_eq!(output, vec![5]);
    }

    #[test]
    fn test_nested_loops_terminate() {
        // cell 3 = 1, cell 4 = 1; the outer loop runs once and clears both.
        let (_, tape) = run_source(">>>+>+<[>[-]<-]", b"");
        assert_eq!(tape.cursor(), 3);
        assert_eq!(tape.get(), 0);
        assert_eq!(tape.as_slice()[4], 0);
    }

    #[test]
    fn test_hello_world() {
        let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let (output, _) = run_source(source, b"");
        assert_eq!(output, b"Hello World!\n".to_vec());
    }

    #[test]
    fn test_walking_left_of_origin() {
        let (output, tape) = run_source("+<<<<<<<<<<<<<<<<<<<<+>>>>>>>>>>>>>>>>>>>>.", b"");
        assert_eq!(output, vec![1]);
        assert_eq!(tape.growth_count(), 2);
    }
}
