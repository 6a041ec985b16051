use std::fmt::{self, Display};

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

/// Label table preserving definition order for display.
pub type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Operation width. Suffix `.b`/`.w`/`.l` in source, word when unspecified.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Size {
    Byte,
    Word,
    Long,
}

impl Size {
    pub fn mask(self) -> u32 {
        match self {
            Size::Byte => 0x0000_00FF,
            Size::Word => 0x0000_FFFF,
            Size::Long => 0xFFFF_FFFF,
        }
    }

    pub fn msb(self) -> u32 {
        match self {
            Size::Byte => 0x80,
            Size::Word => 0x8000,
            Size::Long => 0x8000_0000,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Size::Byte => 8,
            Size::Word => 16,
            Size::Long => 32,
        }
    }

    pub fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Signed view of the low-order lane of `v`.
    pub fn signed(self, v: u32) -> i32 {
        match self {
            Size::Byte => v as u8 as i8 as i32,
            Size::Word => v as u16 as i16 as i32,
            Size::Long => v as i32,
        }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Byte => write!(f, "b"),
            Size::Word => write!(f, "w"),
            Size::Long => write!(f, "l"),
        }
    }
}

/// What a label resolved to during assembly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LabelValue {
    /// Instruction-table index of a code or data label.
    Index(usize),
    /// Constant bound with `EQU`.
    Const(i64),
}

/// Fatal conditions. Once one is recorded the machine is halted for good and
/// every further `step()` reports finished without mutating state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Exception {
    InvalidPc(i64),
    DivisionByZero { line: usize },
    DuplicateLabel { name: String, line: usize },
    UnknownLabel { name: String, line: usize },
    MissingEnd,
    DuplicateEnd { line: usize },
}

impl Exception {
    /// Source line the exception points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Exception::InvalidPc(_) | Exception::MissingEnd => None,
            Exception::DivisionByZero { line }
            | Exception::DuplicateLabel { line, .. }
            | Exception::UnknownLabel { line, .. }
            | Exception::DuplicateEnd { line } => Some(*line),
        }
    }
}

impl Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exception::InvalidPc(pc) => {
                write!(f, "Execution killed: invalid program counter {pc}")
            }
            Exception::DivisionByZero { line } => {
                write!(f, "Execution killed: attempted a divide by zero at line: {line}")
            }
            Exception::DuplicateLabel { name, line } => {
                write!(f, "Execution killed: duplicate label '{name}' at line: {line}")
            }
            Exception::UnknownLabel { name, line } => {
                write!(f, "Execution killed: unknown label '{name}' at line: {line}")
            }
            Exception::MissingEnd => write!(f, "Execution killed: END directive missing"),
            Exception::DuplicateEnd { line } => {
                write!(f, "Execution killed: duplicate END directive at line: {line}")
            }
        }
    }
}

/// Non-fatal error kinds. Execution continues at the next instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    InvalidOpSize,
    InvalidRegister,
    NotAnAddressRegister,
    UnknownOperand,
    WrongArity { expected: usize },
    UnrecognisedInstruction,
    MemoryToMemory,
    InvalidAddress,
    IllegalCombination(&'static str),
    DataOnlySwap,
    ExgRestrictions,
    ClrOnAddress,
    NotOnAddress,
    NegOnAddress,
    ExtOnByte,
    DataOnlyExt,
    MemoryShiftCount,
    MemoryShiftWordOnly,
    ImmediateShiftRange,
    OffsetTooLong(&'static str),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidOpSize => write!(f, "Invalid operation size (defaulted to word)"),
            ErrorKind::InvalidRegister => write!(f, "Invalid register name"),
            ErrorKind::NotAnAddressRegister => write!(f, "Address register expected"),
            ErrorKind::UnknownOperand => write!(f, "Unknown operand"),
            ErrorKind::WrongArity { expected: 1 } => write!(f, "One parameter is expected"),
            ErrorKind::WrongArity { expected } => write!(f, "{expected} parameters are expected"),
            ErrorKind::UnrecognisedInstruction => write!(f, "Unrecognised instruction"),
            ErrorKind::MemoryToMemory => {
                write!(f, "Memory to memory is not allowed for operation")
            }
            ErrorKind::InvalidAddress => write!(f, "Invalid address"),
            ErrorKind::IllegalCombination(op) => {
                write!(f, "Illegal operand combination for {}", op.to_uppercase())
            }
            ErrorKind::DataOnlySwap => write!(f, "Can only SWAP a data register"),
            ErrorKind::ExgRestrictions => write!(f, "Wrong operand types for EXG"),
            ErrorKind::ClrOnAddress => write!(f, "Can't CLR an address register"),
            ErrorKind::NotOnAddress => write!(f, "Can't apply NOT to an address register"),
            ErrorKind::NegOnAddress => write!(f, "Can't negate an address register"),
            ErrorKind::ExtOnByte => write!(f, "Can't EXT a byte"),
            ErrorKind::DataOnlyExt => write!(f, "Can only EXT a data register"),
            ErrorKind::MemoryShiftCount => {
                write!(f, "Memory can be shifted or rotated by at most 1 bit")
            }
            ErrorKind::MemoryShiftWordOnly => {
                write!(f, "Only words can be shifted or rotated in memory")
            }
            ErrorKind::ImmediateShiftRange => {
                write!(f, "Immediate shift and rotate counts are capped at 8 bits")
            }
            ErrorKind::OffsetTooLong(op) => {
                write!(f, "Offset too long for {}", op.to_uppercase())
            }
        }
    }
}

/// One recorded non-fatal error, tagged with the source line it came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub line: usize,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line: {}", self.kind, self.line)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn size_masks() {
        assert_eq!(Size::Byte.mask(), 0xFF);
        assert_eq!(Size::Word.mask(), 0xFFFF);
        assert_eq!(Size::Long.mask(), 0xFFFF_FFFF);
        assert_eq!(Size::Word.msb(), 0x8000);
        assert_eq!(Size::Long.bytes(), 4);
    }

    #[test]
    fn signed_views() {
        assert_eq!(Size::Byte.signed(0xFF), -1);
        assert_eq!(Size::Byte.signed(0x7F), 127);
        assert_eq!(Size::Word.signed(0x8000), -32768);
        assert_eq!(Size::Long.signed(0xFFFF_FFFF), -1);
        // High-order bits outside the lane are ignored.
        assert_eq!(Size::Byte.signed(0xABCD_0001), 1);
    }
}
