//! The octo execution engine
//!
//! Owns memory, the register file, the flag register, and the program
//! counter, and drives the fetch-decode-execute cycle until HLT. Everything
//! here is single-threaded and synchronous: one instruction is the atomic
//! unit of state change, and the cycle limit is only checked between
//! instructions.

use crate::alu::{self, AluError, AluOp};
use crate::error::RuntimeError;
use crate::io::OutputSink;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use octo_spec::{Address, Flags, Instruction, IsaError, Opcode, Register, TraceRow, STACK_INIT};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Maximum number of cycles before the run stops with
    /// [`HaltReason::CycleLimit`]; checked once per cycle boundary
    pub max_cycles: u64,

    /// Emit a trace row to stderr before each instruction executes
    pub trace: bool,

    /// Echo PRN values to stdout as they are emitted
    pub echo: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_cycles: 1_000_000,
            trace: false,
            echo: true,
        }
    }
}

/// Why a run ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// HLT instruction executed
    Halt,
    /// Cycle limit reached before HLT
    CycleLimit,
}

/// Outcome of a completed (non-fatal) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    /// Values emitted by PRN, in execution order
    pub outputs: Vec<u8>,

    /// Reason the run ended
    pub halt_reason: HaltReason,
}

/// The octo machine
#[derive(Debug)]
pub struct Machine {
    memory: Memory,
    regs: RegisterFile,
    flags: Flags,
    pc: Address,
    cycles: u64,
    halted: bool,
    io: OutputSink,
    config: MachineConfig,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        let echo = config.echo;
        let mut regs = RegisterFile::new();
        regs.reset();
        Self {
            memory: Memory::new(),
            regs,
            flags: Flags::CLEAR,
            pc: 0,
            cycles: 0,
            halted: false,
            io: OutputSink::new(echo),
            config,
        }
    }

    /// Convenience constructor: load `program` at address 0
    pub fn with_program(program: &[u8], config: MachineConfig) -> Result<Self, RuntimeError> {
        let mut machine = Self::new(config);
        machine.load_bytes(0, program)?;
        Ok(machine)
    }

    /// Clear execution state: registers (SP back to the stack base), flags,
    /// PC, cycle counter, and the halted latch. Memory contents are kept;
    /// reloading is the loader's job.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.flags = Flags::CLEAR;
        self.pc = 0;
        self.cycles = 0;
        self.halted = false;
        self.io = OutputSink::new(self.config.echo);
    }

    /// Write raw program bytes into memory (loader entry point)
    pub fn load_bytes(&mut self, start: Address, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.memory.load(start, bytes)
    }

    /// Run until HLT, the cycle limit, or a fatal error.
    ///
    /// Fatal conditions (out-of-bounds access, invalid register operand,
    /// divide by zero, unknown opcode, stack overflow/underflow) surface as
    /// `Err` with PC context; nothing is retried.
    pub fn run(&mut self) -> Result<ExecutionResult, RuntimeError> {
        self.regs.set(Register::SP, STACK_INIT);
        tracing::debug!(max_cycles = self.config.max_cycles, "starting run");

        let halt_reason = loop {
            if self.halted {
                break HaltReason::Halt;
            }
            if self.cycles >= self.config.max_cycles {
                break HaltReason::CycleLimit;
            }
            if self.config.trace {
                eprintln!("TRACE: {}", self.trace_row());
            }
            self.step()?;
            self.cycles += 1;
        };

        tracing::debug!(cycles = self.cycles, ?halt_reason, "run finished");
        Ok(ExecutionResult {
            cycles: self.cycles,
            outputs: self.io.take(),
            halt_reason,
        })
    }

    /// Execute a single fetch-decode-execute cycle
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        let inst = self.fetch_and_decode()?;
        self.execute(inst)
    }

    fn fetch_and_decode(&self) -> Result<Instruction, RuntimeError> {
        let opcode_byte = self.memory.read(self.pc)?;
        let opcode = Opcode::from_u8(opcode_byte).ok_or(RuntimeError::UnknownInstruction {
            pc: self.pc,
            opcode: opcode_byte,
        })?;

        let mut operands = [0u8; 2];
        for offset in 0..opcode.operand_count() {
            operands[offset as usize] = self.memory.read(self.pc + 1 + offset as Address)?;
        }

        Instruction::decode(opcode, operands).map_err(|err| match err {
            IsaError::InvalidRegister(index) => RuntimeError::InvalidRegister {
                index,
                pc: self.pc,
            },
            IsaError::InvalidOpcode(op) => RuntimeError::UnknownInstruction {
                pc: self.pc,
                opcode: op,
            },
        })
    }

    /// Dispatch one decoded instruction. Handlers either fall through (the
    /// engine advances PC by the instruction length) or assign PC
    /// themselves, never both.
    fn execute(&mut self, inst: Instruction) -> Result<(), RuntimeError> {
        match inst {
            Instruction::Ldi { reg, value } => {
                self.regs.set(reg, value);
                self.pc += inst.len();
            }

            Instruction::Prn { reg } => {
                self.io.write(self.regs.get(reg));
                self.pc += inst.len();
            }

            Instruction::Hlt => {
                self.halted = true;
            }

            Instruction::Push { reg } => {
                self.push(self.regs.get(reg))?;
                self.pc += inst.len();
            }

            Instruction::Pop { reg } => {
                let value = self.pop()?;
                self.regs.set(reg, value);
                self.pc += inst.len();
            }

            Instruction::Call { reg } => {
                let return_address = self.pc + 2;
                let return_byte = u8::try_from(return_address)
                    .map_err(|_| RuntimeError::OutOfBounds {
                        address: return_address,
                    })?;
                self.push(return_byte)?;
                self.pc = self.regs.get(reg) as Address;
            }

            Instruction::Ret => {
                self.pc = self.pop()? as Address;
            }

            Instruction::Jmp { reg } => {
                self.pc = self.regs.get(reg) as Address;
            }

            Instruction::Jeq { reg } => {
                if self.flags.is_equal() {
                    self.pc = self.regs.get(reg) as Address;
                } else {
                    self.pc += inst.len();
                }
            }

            Instruction::Jne { reg } => {
                // Taken unless the flag register reads exactly Equal
                if self.flags != Flags::EQUAL {
                    self.pc = self.regs.get(reg) as Address;
                } else {
                    self.pc += inst.len();
                }
            }

            Instruction::Cmp { ra, rb } => {
                let pattern = self.alu(AluOp::Cmp, ra, rb)?;
                self.flags = Flags::from_bits(pattern);
                self.pc += inst.len();
            }

            Instruction::Add { ra, rb } => self.alu_store(AluOp::Add, ra, rb, inst.len())?,
            Instruction::Sub { ra, rb } => self.alu_store(AluOp::Sub, ra, rb, inst.len())?,
            Instruction::Mul { ra, rb } => self.alu_store(AluOp::Mul, ra, rb, inst.len())?,
            Instruction::Div { ra, rb } => self.alu_store(AluOp::Div, ra, rb, inst.len())?,
            Instruction::Mod { ra, rb } => self.alu_store(AluOp::Mod, ra, rb, inst.len())?,
            Instruction::And { ra, rb } => self.alu_store(AluOp::And, ra, rb, inst.len())?,
            Instruction::Or { ra, rb } => self.alu_store(AluOp::Or, ra, rb, inst.len())?,
            Instruction::Xor { ra, rb } => self.alu_store(AluOp::Xor, ra, rb, inst.len())?,
            Instruction::Not { ra } => self.alu_store(AluOp::Not, ra, ra, inst.len())?,
            Instruction::Shl { ra, rb } => self.alu_store(AluOp::Shl, ra, rb, inst.len())?,
            Instruction::Shr { ra, rb } => self.alu_store(AluOp::Shr, ra, rb, inst.len())?,
        }
        Ok(())
    }

    fn alu(&self, op: AluOp, ra: Register, rb: Register) -> Result<u8, RuntimeError> {
        alu::evaluate(op, self.regs.get(ra), self.regs.get(rb)).map_err(|err| match err {
            AluError::DivideByZero => RuntimeError::DivideByZero { pc: self.pc },
        })
    }

    /// ALU op whose result lands in `ra`; on error nothing is written
    fn alu_store(
        &mut self,
        op: AluOp,
        ra: Register,
        rb: Register,
        len: Address,
    ) -> Result<(), RuntimeError> {
        let result = self.alu(op, ra, rb)?;
        self.regs.set(ra, result);
        self.pc += len;
        Ok(())
    }

    /// Decrement SP, then write. SP already at 0 means the descending stack
    /// has collided with the bottom of memory.
    fn push(&mut self, value: u8) -> Result<(), RuntimeError> {
        let sp = self.regs.sp();
        let new_sp = sp.checked_sub(1).ok_or(RuntimeError::StackOverflow {
            pc: self.pc,
            sp,
        })?;
        self.memory.write(new_sp as Address, value)?;
        self.regs.set(Register::SP, new_sp);
        Ok(())
    }

    /// Read at SP, then increment. SP at 0xFF cannot advance without
    /// leaving the address space.
    fn pop(&mut self) -> Result<u8, RuntimeError> {
        let sp = self.regs.sp();
        let value = self.memory.read(sp as Address)?;
        let new_sp = sp.checked_add(1).ok_or(RuntimeError::StackUnderflow {
            pc: self.pc,
            sp,
        })?;
        self.regs.set(Register::SP, new_sp);
        Ok(value)
    }

    // ---- read-only observers ----

    pub fn read_register(&self, index: u8) -> Result<u8, RuntimeError> {
        let reg = Register::from_index(index).ok_or(RuntimeError::InvalidRegister {
            index,
            pc: self.pc,
        })?;
        Ok(self.regs.get(reg))
    }

    pub fn read_memory(&self, address: Address) -> Result<u8, RuntimeError> {
        self.memory.read(address)
    }

    #[inline]
    pub fn pc(&self) -> Address {
        self.pc
    }

    #[inline]
    pub fn sp(&self) -> u8 {
        self.regs.sp()
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// PRN values emitted so far
    pub fn outputs(&self) -> &[u8] {
        self.io.values()
    }

    /// Snapshot the state an external tracer prints: PC, the next three raw
    /// memory bytes, and all eight registers. Out-of-range window bytes
    /// read as zero; this never fails and never mutates.
    pub fn trace_row(&self) -> TraceRow {
        let mut window = [0u8; 3];
        for (offset, byte) in window.iter_mut().enumerate() {
            *byte = self.memory.read(self.pc + offset as Address).unwrap_or(0);
        }
        TraceRow::new(self.cycles, self.pc, window, self.regs.snapshot())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}
