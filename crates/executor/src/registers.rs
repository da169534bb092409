//! LS-8 register file.
//!
//! Eight general-purpose byte registers R0..R7. R7 doubles as the stack
//! pointer and is set to the stack-top sentinel before execution begins.
//! The program counter is held separately and is wider than a byte so a
//! sequential advance past the last address is caught by the fetch bounds
//! check instead of silently wrapping to 0.

use crate::error::Ls8Error;
use serde::{Deserialize, Serialize};

/// Number of general-purpose registers.
pub const NUM_REGISTERS: usize = 8;

/// Register index reserved for the stack pointer.
pub const SP: u8 = 7;

/// Initial stack-top address (the stack grows downward from here).
pub const SP_INIT: u8 = 0xF4;

/// Condition flags set by the compare operation, layout `0b00000LGE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    /// Equal bit (`a == b`).
    pub const EQUAL: u8 = 0b001;
    /// Greater-than bit (`a > b`).
    pub const GREATER: u8 = 0b010;
    /// Less-than bit (`a < b`).
    pub const LESS: u8 = 0b100;

    /// All bits clear.
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn equal(&self) -> bool {
        self.0 & Self::EQUAL != 0
    }

    #[inline]
    pub fn greater(&self) -> bool {
        self.0 & Self::GREATER != 0
    }

    #[inline]
    pub fn less(&self) -> bool {
        self.0 & Self::LESS != 0
    }
}

/// LS-8 register state.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    /// General-purpose registers R0..R7 (R7 is the stack pointer).
    regs: [u8; NUM_REGISTERS],
    /// Program counter.
    pub pc: u16,
    /// Condition flags.
    fl: Flags,
}

impl RegisterFile {
    /// Create a register file in its power-on state: everything zero except
    /// the stack pointer, which starts at [`SP_INIT`].
    pub fn new() -> Self {
        let mut regs = [0; NUM_REGISTERS];
        regs[SP as usize] = SP_INIT;
        Self {
            regs,
            pc: 0,
            fl: Flags::empty(),
        }
    }

    /// Get a register value.
    #[inline]
    pub fn get(&self, index: u8) -> Result<u8, Ls8Error> {
        self.regs
            .get(index as usize)
            .copied()
            .ok_or(Ls8Error::RegisterOutOfRange { index })
    }

    /// Set a register value.
    #[inline]
    pub fn set(&mut self, index: u8, val: u8) -> Result<(), Ls8Error> {
        let slot = self
            .regs
            .get_mut(index as usize)
            .ok_or(Ls8Error::RegisterOutOfRange { index })?;
        *slot = val;
        Ok(())
    }

    /// Current stack pointer (alias for R7).
    #[inline]
    pub fn sp(&self) -> u8 {
        self.regs[SP as usize]
    }

    /// Set the stack pointer (alias for R7).
    #[inline]
    pub fn set_sp(&mut self, val: u8) {
        self.regs[SP as usize] = val;
    }

    pub fn flags(&self) -> Flags {
        self.fl
    }

    pub fn set_flags(&mut self, fl: Flags) {
        self.fl = fl;
    }

    /// Copy of all general-purpose registers, for tracing and inspection.
    pub fn snapshot(&self) -> [u8; NUM_REGISTERS] {
        self.regs
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut regs = RegisterFile::new();
        regs.set(3, 99).unwrap();
        assert_eq!(regs.get(3).unwrap(), 99);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut regs = RegisterFile::new();
        assert!(matches!(
            regs.get(8),
            Err(Ls8Error::RegisterOutOfRange { index: 8 })
        ));
        assert!(matches!(
            regs.set(255, 0),
            Err(Ls8Error::RegisterOutOfRange { index: 255 })
        ));
    }

    #[test]
    fn test_sp_aliases_r7() {
        let mut regs = RegisterFile::new();
        assert_eq!(regs.sp(), SP_INIT);
        assert_eq!(regs.get(SP).unwrap(), SP_INIT);
        regs.set_sp(0xF0);
        assert_eq!(regs.get(SP).unwrap(), 0xF0);
    }

    #[test]
    fn test_power_on_state() {
        let regs = RegisterFile::new();
        assert_eq!(regs.pc, 0);
        assert_eq!(regs.flags(), Flags::empty());
        for i in 0..SP {
            assert_eq!(regs.get(i).unwrap(), 0);
        }
    }

    #[test]
    fn test_flag_bits() {
        let fl = Flags::from_bits(Flags::EQUAL);
        assert!(fl.equal());
        assert!(!fl.less());
        assert!(!fl.greater());
    }
}
