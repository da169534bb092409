//! Executor errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Ls8Error {
    #[error("memory address {addr:#06x} out of range")]
    AddressOutOfRange { addr: u16 },

    #[error("register index {index} out of range")]
    RegisterOutOfRange { index: u8 },

    #[error("unsupported ALU operation {opcode:#010b}")]
    UnsupportedAluOp { opcode: u8 },

    #[error("unknown instruction {opcode:#010b} at address {pc:#04x}")]
    UnknownInstruction { opcode: u8, pc: u16 },

    #[error("line {line}: expected an 8-digit binary literal, got {text:?}")]
    InvalidProgramLine { line: usize, text: String },

    #[error("program is {len} bytes but memory holds {max}")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("failed to read program `{}`: {source}", path.display())]
    ProgramRead { path: PathBuf, source: io::Error },
}
