use std::io;

use crate::memory::TypeAddr;

/// Everything that can stop the interpreter. None of these are retried: a
/// machine that faulted is not resumed.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("call stack overflow saving return address {address:#05X}")]
    StackOverflow { address: TypeAddr },

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("memory access out of range at {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("program is {size} bytes, at most {max_size} fit in memory")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("unable to read program image")]
    Io(#[from] io::Error),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}
