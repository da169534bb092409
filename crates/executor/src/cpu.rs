//! LS-8 CPU implementation.
//!
//! # Execution Model
//!
//! A single fetch-decode-execute loop over 256 bytes of RAM. Each step:
//!
//! 1. Fetch the opcode byte at the PC.
//! 2. Decode its structure (operand count, ALU bit, PC-setter bit).
//! 3. Fetch exactly the operand bytes the opcode declares, bounds-checked;
//!    an operand that would sit past the last address is an
//!    `AddressOutOfRange` fault.
//! 4. Dispatch, then advance the PC by `operand_count + 1` unless the
//!    instruction set the PC itself.
//!
//! Every fault is fatal: the machine flips to `Halted` and the typed error
//! bubbles out of [`Cpu::step`] for the caller to report. The core never
//! terminates the process.

use crate::alu::{self, AluOp, AluOutput};
use crate::decode::{opcode, DecodedInstr};
use crate::error::Ls8Error;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::trace::{ExecutionTrace, TraceRow};

/// Run state of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// LS-8 machine state: memory, registers, and the run loop.
pub struct Cpu {
    /// Register file (R0..R7, PC, FL).
    pub regs: RegisterFile,
    /// Memory subsystem.
    pub memory: Memory,
    /// Run state.
    state: State,
    /// Instructions executed so far.
    cycle: u64,
    /// Bytes emitted by PRN, drained with [`Cpu::take_output`].
    output: Vec<u8>,
    /// Execution trace (if tracing is enabled).
    trace: Option<ExecutionTrace>,
    /// Tracing enabled flag.
    tracing: bool,
}

impl Cpu {
    /// Create a new CPU: PC at 0, stack pointer at the stack-top sentinel.
    pub fn new() -> Self {
        Self {
            regs: RegisterFile::new(),
            memory: Memory::new(),
            state: State::Running,
            cycle: 0,
            output: Vec::new(),
            trace: None,
            tracing: false,
        }
    }

    /// Load a program image into memory at address 0.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Ls8Error> {
        self.memory.load(image)
    }

    /// Current run state.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// Instructions executed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Enable execution tracing.
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
        self.trace = Some(ExecutionTrace::new());
    }

    /// Disable tracing and return the collected trace, stamped with the
    /// final machine state.
    pub fn take_trace(&mut self) -> Option<ExecutionTrace> {
        self.tracing = false;
        let mut trace = self.trace.take()?;
        trace.final_regs = self.regs.snapshot();
        trace.final_pc = self.regs.pc;
        trace.total_cycles = self.cycle;
        Some(trace)
    }

    /// Bytes emitted by PRN since the last drain.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Bytes emitted by PRN so far, without draining.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Execute a single instruction, returning the trace row if tracing.
    ///
    /// On error the machine transitions to `Halted` and the fault is
    /// returned for the caller to surface.
    pub fn step(&mut self) -> Result<Option<TraceRow>, Ls8Error> {
        match self.step_inner() {
            Ok(row) => Ok(row),
            Err(e) => {
                self.state = State::Halted;
                Err(e)
            }
        }
    }

    fn step_inner(&mut self) -> Result<Option<TraceRow>, Ls8Error> {
        let pc = self.regs.pc;
        let ir = self.memory.read(pc)?;
        let instr = DecodedInstr::decode(ir);

        // State snapshot before the instruction mutates anything. The two
        // bytes after the opcode are shown as they sit in memory, whether or
        // not the instruction uses them.
        let row = if self.tracing {
            Some(TraceRow::new(
                self.cycle,
                pc,
                ir,
                [
                    self.memory.read(pc + 1).unwrap_or(0),
                    self.memory.read(pc + 2).unwrap_or(0),
                ],
                self.regs.snapshot(),
                self.regs.flags(),
            ))
        } else {
            None
        };

        let mut operands = [0u8; 2];
        for i in 0..instr.operand_count as u16 {
            operands[i as usize] = self.memory.read(pc + 1 + i)?;
        }
        let [op_a, op_b] = operands;

        let mut next_pc = pc + instr.advance();

        match ir {
            opcode::LDI => {
                self.regs.set(op_a, op_b)?;
            }
            opcode::PRN => {
                let val = self.regs.get(op_a)?;
                self.output.extend_from_slice(val.to_string().as_bytes());
                self.output.push(b'\n');
            }
            opcode::HLT => {
                self.state = State::Halted;
                next_pc = pc;
            }
            _ if instr.is_alu => {
                let op = AluOp::from_opcode(ir)?;
                let a = self.regs.get(op_a)?;
                let b = self.regs.get(op_b)?;
                match alu::apply(op, a, b) {
                    AluOutput::Value(v) => self.regs.set(op_a, v)?,
                    AluOutput::Flags(fl) => self.regs.set_flags(fl),
                }
            }
            opcode::PUSH => {
                let val = self.regs.get(op_a)?;
                let sp = self.regs.sp().wrapping_sub(1);
                self.regs.set_sp(sp);
                self.memory.write(sp as u16, val)?;
            }
            opcode::POP => {
                let sp = self.regs.sp();
                let val = self.memory.read(sp as u16)?;
                self.regs.set(op_a, val)?;
                self.regs.set_sp(sp.wrapping_add(1));
            }
            opcode::CALL => {
                let target = self.regs.get(op_a)?;
                let sp = self.regs.sp().wrapping_sub(1);
                self.regs.set_sp(sp);
                // Return address is the instruction after the CALL, stored
                // as a byte like every other memory cell.
                self.memory.write(sp as u16, (pc + 2) as u8)?;
                next_pc = target as u16;
            }
            opcode::RET => {
                let sp = self.regs.sp();
                next_pc = self.memory.read(sp as u16)? as u16;
                self.regs.set_sp(sp.wrapping_add(1));
            }
            opcode::JMP => {
                next_pc = self.regs.get(op_a)? as u16;
            }
            opcode::JEQ => {
                if self.regs.flags().equal() {
                    next_pc = self.regs.get(op_a)? as u16;
                }
            }
            opcode::JNE => {
                if !self.regs.flags().equal() {
                    next_pc = self.regs.get(op_a)? as u16;
                }
            }
            _ => {
                return Err(Ls8Error::UnknownInstruction { opcode: ir, pc });
            }
        }

        self.regs.pc = next_pc;
        self.cycle += 1;

        if let Some(trace) = &mut self.trace {
            if let Some(row) = row {
                trace.push(row);
            }
        }

        Ok(row)
    }

    /// Run until the program halts or a fault occurs.
    pub fn run(&mut self) -> Result<(), Ls8Error> {
        while self.state == State::Running {
            self.step()?;
        }
        Ok(())
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::SP_INIT;

    #[test]
    fn test_ldi() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[opcode::LDI, 0, 42, opcode::HLT]).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.regs.get(0).unwrap(), 42);
        assert_eq!(cpu.regs.pc, 3);
    }

    #[test]
    fn test_prn_emits_decimal_line() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[opcode::LDI, 0, 8, opcode::PRN, 0, opcode::HLT])
            .unwrap();
        cpu.run().unwrap();
        assert_eq!(cpu.output(), b"8\n");
    }

    #[test]
    fn test_hlt_stops_the_loop() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[opcode::HLT]).unwrap();
        cpu.run().unwrap();
        assert!(cpu.is_halted());
        assert_eq!(cpu.regs.pc, 0);
        assert_eq!(cpu.cycle(), 1);
    }

    #[test]
    fn test_sp_starts_at_sentinel() {
        let cpu = Cpu::new();
        assert_eq!(cpu.regs.sp(), SP_INIT);
    }

    #[test]
    fn test_unknown_instruction_halts() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[0xFF]).unwrap();
        let err = cpu.step().unwrap_err();
        assert!(matches!(
            err,
            Ls8Error::UnknownInstruction { opcode: 0xFF, pc: 0 }
        ));
        assert!(cpu.is_halted());
    }

    #[test]
    fn test_alu_bit_opcode_outside_table() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[0b1010_0001, 0, 1]).unwrap();
        assert!(matches!(
            cpu.step(),
            Err(Ls8Error::UnsupportedAluOp { opcode: 0b1010_0001 })
        ));
        assert!(cpu.is_halted());
    }

    #[test]
    fn test_operand_fetch_past_end_of_memory() {
        let mut cpu = Cpu::new();
        cpu.memory.write(255, opcode::LDI).unwrap();
        cpu.regs.pc = 255;
        assert!(matches!(
            cpu.step(),
            Err(Ls8Error::AddressOutOfRange { addr: 256 })
        ));
        assert!(cpu.is_halted());
    }

    #[test]
    fn test_bad_register_operand() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[opcode::LDI, 9, 1]).unwrap();
        assert!(matches!(
            cpu.step(),
            Err(Ls8Error::RegisterOutOfRange { index: 9 })
        ));
    }

    #[test]
    fn test_trace_rows_capture_pre_state() {
        let mut cpu = Cpu::new();
        cpu.enable_tracing();
        cpu.load_program(&[opcode::LDI, 0, 8, opcode::PRN, 0, opcode::HLT])
            .unwrap();
        cpu.run().unwrap();
        let trace = cpu.take_trace().unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.rows[0].pc, 0);
        assert_eq!(trace.rows[0].ir, opcode::LDI);
        assert_eq!(trace.rows[0].operands, [0, 8]);
        assert_eq!(trace.rows[0].regs[0], 0);
        assert_eq!(trace.rows[1].regs[0], 8);
        assert_eq!(trace.total_cycles, 3);
        assert_eq!(trace.final_pc, 5);
    }
}
