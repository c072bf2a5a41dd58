//! Execution trace types
//!
//! A [`TraceRow`] is a read-only snapshot of machine state taken before an
//! instruction executes. The runtime produces one per cycle when tracing is
//! enabled; observers only format it, never feed it back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single execution trace row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Cycle number
    pub cycle: u64,

    /// Program counter at fetch time
    pub pc: u16,

    /// The next three raw memory bytes starting at PC (opcode plus the
    /// bytes any operands would occupy)
    pub window: [u8; 3],

    /// All eight register values
    pub registers: [u8; 8],
}

impl TraceRow {
    pub fn new(cycle: u64, pc: u16, window: [u8; 3], registers: [u8; 8]) -> Self {
        Self {
            cycle,
            pc,
            window,
            registers,
        }
    }
}

impl fmt::Display for TraceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X} | {:02X} {:02X} {:02X} |",
            self.pc, self.window[0], self.window[1], self.window[2]
        )?;
        for value in self.registers {
            write!(f, " {:02X}", value)?;
        }
        Ok(())
    }
}
