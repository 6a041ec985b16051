//! Operand and mnemonic parsing shared by the assembler and the runtime.
//!
//! The register file is a single sixteen-slot array: a0-a7 occupy slots 0-7
//! (a7 doubling as the stack pointer) and d0-d7 occupy slots 8-15.

use crate::symbol::{ErrorKind, Size};

pub const SP: usize = 7;
pub const DATA_BASE: usize = 8;

/// A parsed addressing mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand {
    /// dN, register file slot 8..=15.
    DataReg(usize),
    /// aN or sp, register file slot 0..=7.
    AddrReg(usize),
    /// #imm with `$`/`%` prefixes for hex and binary.
    Immediate(i64),
    /// A bare literal used as a memory address.
    Absolute(i64),
    /// (aN) and d(aN); `-(aN)` and `(aN)+` carry a one-byte displacement.
    Indirect { reg: usize, offset: i64 },
}

impl Operand {
    pub fn is_register(self) -> bool {
        matches!(self, Operand::DataReg(_) | Operand::AddrReg(_))
    }

    /// True for the modes that read or write memory.
    pub fn is_memory(self) -> bool {
        matches!(self, Operand::Absolute(_) | Operand::Indirect { .. })
    }
}

/// Register file slot for a register name, `None` for anything else.
pub fn parse_register(token: &str) -> Option<usize> {
    let token = token.trim();
    if token == "sp" {
        return Some(SP);
    }
    let mut chars = token.chars();
    let class = chars.next()?;
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() || digit > 7 {
        return None;
    }
    match class {
        'a' => Some(digit as usize),
        'd' => Some(DATA_BASE + digit as usize),
        _ => None,
    }
}

/// Numeric literal: decimal, `$` hex, or `%` binary, with an optional
/// leading minus.
pub fn parse_literal(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, token) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let value = if let Some(hex) = token.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = token.strip_prefix('%') {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        token.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

/// One operand token to its addressing mode.
pub fn parse_operand(token: &str) -> Result<Operand, ErrorKind> {
    let token = token.trim();

    if let (Some(open), Some(close)) = (token.find('('), token.find(')')) {
        if close < open {
            return Err(ErrorKind::UnknownOperand);
        }
        let inner = &token[open + 1..close];
        let reg = match parse_register(inner) {
            Some(reg) if reg < DATA_BASE => reg,
            _ => return Err(ErrorKind::NotAnAddressRegister),
        };
        // -(aN) and (aN)+ land one byte either side of the register.
        if token.starts_with('-') {
            return Ok(Operand::Indirect { reg, offset: -1 });
        }
        if token.ends_with('+') {
            return Ok(Operand::Indirect { reg, offset: 1 });
        }
        if open == 0 {
            return Ok(Operand::Indirect { reg, offset: 0 });
        }
        let offset = parse_literal(&token[..open]).ok_or(ErrorKind::UnknownOperand)?;
        return Ok(Operand::Indirect { reg, offset });
    }

    if token.starts_with('a') || token.starts_with('d') || token == "sp" {
        return match parse_register(token) {
            Some(reg) if reg < DATA_BASE => Ok(Operand::AddrReg(reg)),
            Some(reg) => Ok(Operand::DataReg(reg - DATA_BASE)),
            None => Err(ErrorKind::InvalidRegister),
        };
    }

    if let Some(rest) = token.strip_prefix('#') {
        return parse_literal(rest)
            .map(Operand::Immediate)
            .ok_or(ErrorKind::UnknownOperand);
    }

    parse_literal(token)
        .map(Operand::Absolute)
        .ok_or(ErrorKind::UnknownOperand)
}

/// Splits `mnemonic.suffix`, reporting an unknown suffix. The size defaults
/// to word either way.
pub fn parse_mnemonic(token: &str) -> (&str, Size, bool) {
    match token.split_once('.') {
        Some((base, suffix)) => match suffix {
            "b" => (base, Size::Byte, true),
            "w" => (base, Size::Word, true),
            "l" => (base, Size::Long, true),
            _ => (base, Size::Word, false),
        },
        None => (token, Size::Word, true),
    }
}

/// The b<cc> family plus bra/bsr; their last operand is a label.
pub fn is_branch(mnemonic: &str) -> bool {
    matches!(
        mnemonic,
        "bra" | "bsr" | "beq" | "bne" | "bge" | "bgt" | "ble" | "blt"
    )
}

pub fn is_jump(mnemonic: &str) -> bool {
    matches!(mnemonic, "jmp" | "jsr")
}

pub fn takes_no_operands(mnemonic: &str) -> bool {
    mnemonic == "rts"
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registers_map_to_slots() {
        assert_eq!(parse_register("a0"), Some(0));
        assert_eq!(parse_register("a7"), Some(7));
        assert_eq!(parse_register("sp"), Some(7));
        assert_eq!(parse_register("d0"), Some(8));
        assert_eq!(parse_register("d7"), Some(15));
        assert_eq!(parse_register("d8"), None);
        assert_eq!(parse_register("x0"), None);
    }

    #[test]
    fn literals_in_three_bases() {
        assert_eq!(parse_literal("42"), Some(42));
        assert_eq!(parse_literal("-42"), Some(-42));
        assert_eq!(parse_literal("$ff"), Some(255));
        assert_eq!(parse_literal("%1010"), Some(10));
        assert_eq!(parse_literal("bogus"), None);
    }

    #[test]
    fn operand_modes() {
        assert_eq!(parse_operand("d3"), Ok(Operand::DataReg(3)));
        assert_eq!(parse_operand("a1"), Ok(Operand::AddrReg(1)));
        assert_eq!(parse_operand("#$10"), Ok(Operand::Immediate(16)));
        assert_eq!(parse_operand("#-5"), Ok(Operand::Immediate(-5)));
        assert_eq!(parse_operand("$1000"), Ok(Operand::Absolute(0x1000)));
        assert_eq!(parse_operand("(a0)"), Ok(Operand::Indirect { reg: 0, offset: 0 }));
        assert_eq!(parse_operand("$10(a2)"), Ok(Operand::Indirect { reg: 2, offset: 16 }));
        assert_eq!(parse_operand("-(a0)"), Ok(Operand::Indirect { reg: 0, offset: -1 }));
        assert_eq!(parse_operand("(a0)+"), Ok(Operand::Indirect { reg: 0, offset: 1 }));
    }

    #[test]
    fn indirect_requires_address_register() {
        assert_eq!(parse_operand("(d0)"), Err(ErrorKind::NotAnAddressRegister));
    }

    #[test]
    fn junk_is_unknown() {
        assert_eq!(parse_operand("#nope"), Err(ErrorKind::UnknownOperand));
        assert_eq!(parse_operand("&&"), Err(ErrorKind::UnknownOperand));
    }

    #[test]
    fn mnemonic_sizes() {
        assert_eq!(parse_mnemonic("add.l"), ("add", Size::Long, true));
        assert_eq!(parse_mnemonic("add.b"), ("add", Size::Byte, true));
        assert_eq!(parse_mnemonic("add"), ("add", Size::Word, true));
        assert_eq!(parse_mnemonic("add.x"), ("add", Size::Word, false));
    }

    #[test]
    fn instruction_classes() {
        assert!(is_branch("beq"));
        assert!(!is_branch("jmp"));
        assert!(is_jump("jsr"));
        assert!(takes_no_operands("rts"));
    }
}
