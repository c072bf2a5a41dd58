//! Runtime error types
//!
//! Every variant is fatal to the current run: the engine terminates and
//! reports the error with enough PC/opcode context to diagnose. Nothing is
//! retried.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Memory access out of bounds: address {address:#06x}")]
    OutOfBounds { address: u16 },

    #[error("Invalid register index {index} at PC {pc:#04x}")]
    InvalidRegister { index: u8, pc: u16 },

    #[error("Division by zero at PC {pc:#04x}")]
    DivideByZero { pc: u16 },

    #[error("Unknown instruction {opcode:#010b} at PC {pc:#04x}")]
    UnknownInstruction { pc: u16, opcode: u8 },

    #[error("Stack overflow at PC {pc:#04x}: SP {sp:#04x} cannot grow below address 0")]
    StackOverflow { pc: u16, sp: u8 },

    #[error("Stack underflow at PC {pc:#04x}: SP {sp:#04x} cannot leave the address space")]
    StackUnderflow { pc: u16, sp: u8 },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
