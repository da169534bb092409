//! Per-step execution trace.
//!
//! Each executed instruction can produce a [`TraceRow`] capturing the
//! machine state before the instruction ran. Rows format as the classic
//! one-line state dump and serialize to JSON for offline inspection.

use crate::registers::{Flags, NUM_REGISTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row of the execution trace.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TraceRow {
    /// Step number.
    pub clk: u64,
    /// Program counter before this instruction.
    pub pc: u16,
    /// Opcode byte fetched at the PC.
    pub ir: u8,
    /// The two bytes following the opcode, as they sat in memory.
    pub operands: [u8; 2],
    /// Register values before this instruction.
    pub regs: [u8; NUM_REGISTERS],
    /// Condition flags before this instruction.
    pub fl: Flags,
}

impl TraceRow {
    pub fn new(
        clk: u64,
        pc: u16,
        ir: u8,
        operands: [u8; 2],
        regs: [u8; NUM_REGISTERS],
        fl: Flags,
    ) -> Self {
        Self {
            clk,
            pc,
            ir,
            operands,
            regs,
            fl,
        }
    }
}

impl fmt::Display for TraceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc, self.ir, self.operands[0], self.operands[1]
        )?;
        for r in self.regs {
            write!(f, " {r:02X}")?;
        }
        Ok(())
    }
}

/// The collected trace of a run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// One row per executed instruction.
    pub rows: Vec<TraceRow>,
    /// Register values when the trace was taken.
    pub final_regs: [u8; NUM_REGISTERS],
    /// Program counter when the trace was taken.
    pub final_pc: u16,
    /// Total instructions executed.
    pub total_cycles: u64,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: TraceRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_display() {
        let row = TraceRow::new(
            0,
            0,
            0x82,
            [0x00, 0x08],
            [0, 0, 0, 0, 0, 0, 0, 0xF4],
            Flags::empty(),
        );
        assert_eq!(
            row.to_string(),
            "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4"
        );
    }

    #[test]
    fn test_trace_serializes() {
        let mut trace = ExecutionTrace::new();
        trace.push(TraceRow::new(
            0,
            0,
            0x01,
            [0, 0],
            [0; NUM_REGISTERS],
            Flags::empty(),
        ));
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"rows\""));
    }
}
