//! End-to-end integration tests for the octo toolchain
//!
//! These tests verify the complete workflow:
//! 1. Parse a program image (the text format the loader reads from disk)
//! 2. Execute the bytes in the machine
//! 3. Verify PRN outputs, flags, and stack discipline

use octo_loader::parse_image;
use octo_runtime::{HaltReason, Machine, MachineConfig, RuntimeError};
use octo_spec::STACK_INIT;

fn quiet() -> MachineConfig {
    MachineConfig {
        echo: false,
        ..MachineConfig::default()
    }
}

fn run_image(source: &str) -> (Machine, octo_runtime::ExecutionResult) {
    let program = parse_image(source);
    let mut machine = Machine::with_program(&program, quiet()).expect("load failed");
    let result = machine.run().expect("execution failed");
    (machine, result)
}

// ============================================================================
// Load -> Execute Tests
// ============================================================================

#[test]
fn test_print_eight() {
    // LDI r0, 8; PRN r0; HLT
    let source = r#"
10000010
00000000
00001000
01000111
00000000
00000001
"#;
    let (_, result) = run_image(source);
    assert_eq!(result.outputs, vec![8]);
    assert_eq!(result.halt_reason, HaltReason::Halt);
}

#[test]
fn test_multiply() {
    // LDI r0, 5; LDI r1, 6; MUL r0, r1; PRN r0; HLT
    let source = r#"
10000010 # LDI r0, 5
00000000
00000101
10000010 # LDI r1, 6
00000001
00000110
10100010 # MUL r0, r1
00000000
00000001
01000111 # PRN r0
00000000
00000001 # HLT
"#;
    let (_, result) = run_image(source);
    assert_eq!(result.outputs, vec![30]);
}

#[test]
fn test_stack_round_trip() {
    // LDI r0, 42; PUSH r0; POP r1; PRN r1; HLT
    let source = r#"
10000010 # LDI r0, 42
00000000
00101010
01000101 # PUSH r0
00000000
01000110 # POP r1
00000001
01000111 # PRN r1
00000001
00000001 # HLT
"#;
    let (machine, result) = run_image(source);
    assert_eq!(result.outputs, vec![42]);
    assert_eq!(machine.sp(), STACK_INIT);
}

#[test]
fn test_compare_and_conditional_jumps() {
    // CMP r0(=5), r1(=5) sets Equal only; JNE falls through, JEQ is taken.
    //  0: LDI r0, 5
    //  3: LDI r1, 5
    //  6: LDI r2, 19   (jump target: the HLT)
    //  9: CMP r0, r1
    // 12: JNE r2       (not taken: flags are exactly Equal)
    // 14: PRN r0       (runs)
    // 16: JEQ r2       (taken)
    // 18: trap byte    (skipped)
    // 19: HLT
    let source = r#"
10000010
00000000
00000101
10000010
00000001
00000101
10000010
00000010
00010011
10100111
00000000
00000001
01010110
00000010
01000111
00000000
01010101
00000010
11111111
00000001
"#;
    let (machine, result) = run_image(source);
    assert_eq!(result.outputs, vec![5]);
    assert_eq!(result.halt_reason, HaltReason::Halt);
    assert!(machine.flags().is_equal());
}

#[test]
fn test_subroutine_call() {
    // main: load the subroutine address, call it, print, halt.
    //  0: LDI r1, 10
    //  3: CALL r1      (pushes 5)
    //  5: PRN r0
    //  7: HLT
    //  8: (padding)
    // 10: LDI r0, 99
    // 13: RET
    let source = r#"
10000010
00000001
00001010
01010000
00000001
01000111
00000000
00000001
00000000
00000000
10000010
00000000
01100011
00010001
"#;
    let (machine, result) = run_image(source);
    assert_eq!(result.outputs, vec![99]);
    assert_eq!(machine.sp(), STACK_INIT);
}

#[test]
fn test_malformed_lines_do_not_shift_addresses() {
    // The junk lines sit between real bytes; if any of them consumed an
    // address the operands below would slide and the program would break.
    let source = r#"
10000010
oops
00000000
00001000
        # just a comment
01000111
00000000
not-binary-either
00000001
"#;
    let (_, result) = run_image(source);
    assert_eq!(result.outputs, vec![8]);
    assert_eq!(result.halt_reason, HaltReason::Halt);
}

// ============================================================================
// Fatal-path Tests
// ============================================================================

#[test]
fn test_divide_by_zero_is_fatal_end_to_end() {
    // LDI r0, 1; LDI r1, 0; DIV r0, r1
    let source = r#"
10000010
00000000
00000001
10000010
00000001
00000000
10100011
00000000
00000001
"#;
    let program = parse_image(source);
    let mut machine = Machine::with_program(&program, quiet()).unwrap();
    let err = machine.run().unwrap_err();
    assert_eq!(err, RuntimeError::DivideByZero { pc: 6 });
}

#[test]
fn test_unknown_opcode_is_fatal_end_to_end() {
    let program = parse_image("11111111\n");
    let mut machine = Machine::with_program(&program, quiet()).unwrap();
    let err = machine.run().unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnknownInstruction {
            pc: 0,
            opcode: 0b1111_1111
        }
    );
}

#[test]
fn test_trace_rows_match_memory_window() {
    let program = parse_image("10000010\n00000000\n00001000\n00000001\n");
    let machine = Machine::with_program(&program, quiet()).unwrap();
    let row = machine.trace_row();
    assert_eq!(row.to_string(), "00 | 82 00 08 | 00 00 00 00 00 00 00 F4");
}
