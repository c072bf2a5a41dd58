//! # octo runtime
//!
//! Execution engine for the octo 8-bit register machine.
//!
//! ## Features
//!
//! - **22 instructions**: the complete instruction set, dispatched through
//!   an exhaustive match over a closed enum
//! - **256 bytes of memory**: flat, bounds-checked
//! - **8 registers**: R7 doubles as the stack pointer
//! - **Descending stack**: PUSH/POP and CALL/RET
//! - **Fatal-only errors**: any invariant violation halts the machine with
//!   PC/opcode context
//!
//! ## Example
//!
//! ```rust
//! use octo_runtime::{Machine, MachineConfig};
//!
//! // LDI r0, 8; PRN r0; HLT
//! let program = [0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001];
//! let config = MachineConfig { echo: false, ..MachineConfig::default() };
//! let mut machine = Machine::with_program(&program, config).unwrap();
//! let result = machine.run().unwrap();
//! assert_eq!(result.outputs, vec![8]);
//! ```

pub mod error;
pub mod memory;
pub mod registers;
pub mod alu;
pub mod io;
pub mod machine;

pub use alu::{evaluate, AluError, AluOp};
pub use error::RuntimeError;
pub use io::OutputSink;
pub use machine::{ExecutionResult, HaltReason, Machine, MachineConfig};
pub use memory::Memory;
pub use registers::RegisterFile;

/// Simple execution helper
///
/// Loads `program` at address 0 and runs it to completion with default
/// configuration, returning the PRN outputs.
pub fn run(program: &[u8]) -> Result<Vec<u8>, RuntimeError> {
    let mut machine = Machine::with_program(program, MachineConfig::default())?;
    Ok(machine.run()?.outputs)
}
