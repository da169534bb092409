//! `.ls8` program loader.
//!
//! Programs are text files carrying one byte per line as an 8-digit binary
//! literal. Everything from a `#` to the end of the line is a comment, and
//! blank lines are skipped:
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Bytes are written to memory starting at address 0 in file order.

use crate::error::Ls8Error;
use crate::memory::Memory;
use std::fs;
use std::path::Path;

/// A parsed program image, ready to load into memory.
#[derive(Clone, Debug, Default)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Parse program source text.
    ///
    /// Any non-blank line that is not exactly eight binary digits (after
    /// comment stripping and trimming) is an `InvalidProgramLine`; line
    /// numbers in errors are 1-based.
    pub fn parse(source: &str) -> Result<Self, Ls8Error> {
        let mut bytes = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.len() != 8 || !line.bytes().all(|b| b == b'0' || b == b'1') {
                return Err(Ls8Error::InvalidProgramLine {
                    line: idx + 1,
                    text: line.to_string(),
                });
            }
            let value =
                u8::from_str_radix(line, 2).map_err(|_| Ls8Error::InvalidProgramLine {
                    line: idx + 1,
                    text: line.to_string(),
                })?;
            bytes.push(value);
        }
        Ok(Self { bytes })
    }

    /// Read and parse a program file.
    pub fn from_file(path: &Path) -> Result<Self, Ls8Error> {
        let source = fs::read_to_string(path).map_err(|source| Ls8Error::ProgramRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Write the image into memory starting at address 0.
    pub fn load_into(&self, memory: &mut Memory) -> Result<(), Ls8Error> {
        memory.load(&self.bytes)
    }

    /// The raw program bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
