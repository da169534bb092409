//! ls8-executor: LS-8 8-bit microcomputer emulator core.
//!
//! This crate provides:
//! - A minimal LS-8 CPU emulator (256 bytes of RAM, 8 registers, no MMU)
//! - A loader for the `.ls8` binary-text program format
//! - Per-step execution trace output

pub mod alu;
pub mod cpu;
pub mod decode;
pub mod error;
pub mod loader;
pub mod memory;
pub mod registers;
pub mod trace;

pub use cpu::{Cpu, State};
pub use error::Ls8Error;
pub use loader::Program;
pub use memory::Memory;
pub use registers::{Flags, RegisterFile};
pub use trace::{ExecutionTrace, TraceRow};
