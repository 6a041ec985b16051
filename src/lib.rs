// Assembling
mod asm;
pub use asm::{assemble, encoded_size, Program, Row};
mod parse;
pub use parse::{Operand, DATA_BASE, SP};

// Running
mod runtime;
pub use runtime::{Emulator, LAST_INSTRUCTION_DEFAULT};
mod memory;
pub use memory::{Memory, ADDRESS_MAX};
mod ops;
pub use ops::{CARRY, EXTEND, NEGATIVE, OVERFLOW, ZERO};
mod undo;

mod symbol;
pub use symbol::{ErrorKind, Exception, LabelValue, RuntimeError, Size};

pub mod error;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 8;
