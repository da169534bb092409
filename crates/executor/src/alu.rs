//! Arithmetic/logic unit.
//!
//! Stateless: every operation maps two register values to either a result
//! byte or a fresh set of condition flags. All arithmetic wraps to the
//! 8-bit range.

use crate::decode::opcode;
use crate::error::Ls8Error;
use crate::registers::Flags;
use std::cmp::Ordering;

/// Operations the ALU knows how to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
    Cmp,
}

impl AluOp {
    /// Map an ALU-class opcode to its operation.
    ///
    /// An opcode that carries the ALU bit but is not in the table is an
    /// `UnsupportedAluOp` fault; there is no recovery path.
    pub fn from_opcode(op: u8) -> Result<Self, Ls8Error> {
        match op {
            opcode::ADD => Ok(AluOp::Add),
            opcode::MUL => Ok(AluOp::Mul),
            opcode::CMP => Ok(AluOp::Cmp),
            _ => Err(Ls8Error::UnsupportedAluOp { opcode: op }),
        }
    }
}

/// What an ALU operation produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOutput {
    /// A value the caller stores back into the first operand register.
    Value(u8),
    /// New condition flags (compare).
    Flags(Flags),
}

/// Apply an ALU operation to two register values.
pub fn apply(op: AluOp, a: u8, b: u8) -> AluOutput {
    match op {
        AluOp::Add => AluOutput::Value(a.wrapping_add(b)),
        AluOp::Mul => AluOutput::Value(a.wrapping_mul(b)),
        AluOp::Cmp => AluOutput::Flags(compare(a, b)),
    }
}

/// Compare two values into a flags pattern with exactly one bit set.
///
/// Built from empty flags each time, so a bit left over from an earlier
/// compare can never leak into the result.
fn compare(a: u8, b: u8) -> Flags {
    Flags::from_bits(match a.cmp(&b) {
        Ordering::Equal => Flags::EQUAL,
        Ordering::Less => Flags::LESS,
        Ordering::Greater => Flags::GREATER,
    })
}
