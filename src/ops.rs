//! Pure arithmetic and condition-code helpers. Every function takes the
//! current destination value and CCR and returns the new pair; nothing in
//! here touches machine state. Destination bits above the operation size
//! are always carried through untouched.

use crate::symbol::Size;

pub const CARRY: u8 = 0x01;
pub const OVERFLOW: u8 = 0x02;
pub const ZERO: u8 = 0x04;
pub const NEGATIVE: u8 = 0x08;
pub const EXTEND: u8 = 0x10;

/// Zero/negative bits for a sized result.
fn zn(res: u32, size: Size) -> u8 {
    let mut bits = 0;
    if res & size.mask() == 0 {
        bits |= ZERO;
    }
    if res & size.msb() != 0 {
        bits |= NEGATIVE;
    }
    bits
}

/// Splice a sized result back over the destination, keeping high bits.
fn splice(dest: u32, res: u32, size: Size) -> u32 {
    (dest & !size.mask()) | (res & size.mask())
}

/// Addition and subtraction share one flag path. Carry comes from the bits
/// that fall outside the size mask of the full-width result; Extend copies
/// Carry. All five bits are written, so the previous CCR does not matter.
pub fn add_op(src: u32, dest: u32, _ccr: u8, size: Size, is_sub: bool) -> (u32, u8) {
    let mask = u64::from(size.mask());
    let a = u64::from(dest & size.mask());
    let b = u64::from(src & size.mask());
    let full = if is_sub { a.wrapping_sub(b) } else { a + b };
    let res = (full as u32) & size.mask();

    let sa = size.signed(src);
    let sd = size.signed(dest);
    let sr = size.signed(res);
    let overflow = if is_sub {
        (sa < 0) != (sd < 0) && (sr < 0) != (sd < 0)
    } else {
        (sa < 0) == (sd < 0) && (sr < 0) != (sd < 0)
    };

    let mut flags = zn(res, size);
    if full & !mask != 0 {
        flags |= CARRY | EXTEND;
    }
    if overflow {
        flags |= OVERFLOW;
    }
    (splice(dest, res, size), flags)
}

/// Clears Carry and Overflow, derives Zero/Negative from the sized value,
/// keeps Extend. The flag behaviour shared by move, not, and, or, eor.
fn move_ccr(res: u32, ccr: u8, size: Size) -> u8 {
    (ccr & EXTEND) | zn(res, size)
}

pub fn move_op(src: u32, dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let res = splice(dest, src, size);
    (res, move_ccr(src, ccr, size))
}

pub fn not_op(dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let res = splice(dest, !dest, size);
    (res, move_ccr(res, ccr, size))
}

pub fn and_op(src: u32, dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let res = splice(dest, src & dest, size);
    (res, move_ccr(res, ccr, size))
}

pub fn or_op(src: u32, dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let res = splice(dest, src | dest, size);
    (res, move_ccr(res, ccr, size))
}

pub fn eor_op(src: u32, dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let res = splice(dest, src ^ dest, size);
    (res, move_ccr(res, ccr, size))
}

/// Zeroes the sized lane. Sets Zero, clears Carry/Overflow/Negative, keeps
/// Extend.
pub fn clr_op(dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    (dest & !size.mask(), (ccr & EXTEND) | ZERO)
}

pub fn swap_op(value: u32, ccr: u8) -> (u32, u8) {
    let res = value.rotate_left(16);
    (res, move_ccr(res, ccr, Size::Long))
}

/// Sign extension. `.w` widens the low byte into the low word, `.l` widens
/// the low word into the full register. Byte is rejected upstream.
pub fn ext_op(value: u32, ccr: u8, size: Size) -> (u32, u8) {
    match size {
        Size::Word => {
            let widened = value as u8 as i8 as i16 as u16;
            let res = (value & !Size::Word.mask()) | u32::from(widened);
            (res, move_ccr(res, ccr, Size::Word))
        }
        _ => {
            let res = value as u16 as i16 as i32 as u32;
            (res, move_ccr(res, ccr, Size::Long))
        }
    }
}

/// `0 - value` through the subtraction flag path, high bits preserved.
pub fn neg_op(dest: u32, ccr: u8, size: Size) -> (u32, u8) {
    let (res, flags) = add_op(dest, 0, ccr, size, true);
    (splice(dest, res, size), flags)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shift {
    Asl,
    Asr,
    Lsl,
    Lsr,
    Rol,
    Ror,
}

impl Shift {
    pub fn is_rotate(self) -> bool {
        matches!(self, Shift::Rol | Shift::Ror)
    }
}

/// One sized lane shifted or rotated bit by bit. A count of zero clears
/// Carry and leaves Extend alone; rotates never touch Extend. Overflow is
/// set for `asl`/`asr` when the sign bit differs before and after.
pub fn shift_op(kind: Shift, dest: u32, count: u32, ccr: u8, size: Size) -> (u32, u8) {
    let mask = size.mask();
    let msb = size.msb();
    let mut lane = dest & mask;
    let sign_before = lane & msb;
    let mut carry = 0u32;

    for _ in 0..count {
        match kind {
            Shift::Asl | Shift::Lsl => {
                carry = lane & msb;
                lane = (lane << 1) & mask;
            }
            Shift::Lsr => {
                carry = lane & 1;
                lane >>= 1;
            }
            Shift::Asr => {
                carry = lane & 1;
                lane = (lane >> 1) | (lane & msb);
            }
            Shift::Rol => {
                carry = lane & msb;
                lane = ((lane << 1) & mask) | u32::from(carry != 0);
            }
            Shift::Ror => {
                carry = lane & 1;
                lane = (lane >> 1) | if carry != 0 { msb } else { 0 };
            }
        }
    }

    let mut flags = zn(lane, size) | (ccr & EXTEND);
    if count > 0 {
        if carry != 0 {
            flags |= CARRY;
            if !kind.is_rotate() {
                flags |= EXTEND;
            }
        } else if !kind.is_rotate() {
            flags &= !EXTEND;
        }
    }
    if kind == Shift::Asl && (lane & msb) != sign_before {
        flags |= OVERFLOW;
    }
    (splice(dest, lane, size), flags)
}

/// 16 x 16 -> 32 multiply. Clears Carry and Overflow, keeps Extend.
pub fn mul_op(src: u32, dest: u32, ccr: u8, unsigned: bool) -> (u32, u8) {
    let res = if unsigned {
        u32::from(src as u16) * u32::from(dest as u16)
    } else {
        (i32::from(src as u16 as i16) * i32::from(dest as u16 as i16)) as u32
    };
    (res, move_ccr(res, ccr, Size::Long))
}

/// 32 / 16 divide packing the remainder into the high word and the quotient
/// into the low word. Overflow (quotient does not fit sixteen bits) sets
/// Overflow, clears Carry, and leaves the dividend untouched. A zero divisor
/// is a fatal exception and is ruled out by the caller.
pub fn div_op(src: u32, dest: u32, ccr: u8, unsigned: bool) -> (u32, u8) {
    if unsigned {
        let divisor = u32::from(src as u16);
        let quotient = dest / divisor;
        let remainder = dest % divisor;
        if quotient > 0xFFFF {
            return (dest, (ccr & !CARRY) | OVERFLOW);
        }
        let res = (remainder << 16) | quotient;
        (res, (ccr & EXTEND) | zn(quotient, Size::Word))
    } else {
        let divisor = i32::from(src as u16 as i16);
        let dividend = dest as i32;
        let quotient = dividend.wrapping_div(divisor);
        let remainder = dividend.wrapping_rem(divisor);
        if quotient > i32::from(i16::MAX) || quotient < i32::from(i16::MIN) {
            return (dest, (ccr & !CARRY) | OVERFLOW);
        }
        let res = ((remainder as u32) << 16) | (quotient as u32 & 0xFFFF);
        (res, (ccr & EXTEND) | zn(quotient as u32, Size::Word))
    }
}

/// Subtraction flags without writing the destination. Extend is restored to
/// its previous value.
pub fn cmp_op(src: u32, dest: u32, ccr: u8, size: Size) -> u8 {
    let (_, flags) = add_op(src, dest, ccr, size, true);
    (flags & !EXTEND) | (ccr & EXTEND)
}

/// Zero/Negative from the sized value, Carry/Overflow cleared.
pub fn tst_op(value: u32, ccr: u8, size: Size) -> u8 {
    move_ccr(value, ccr, size)
}

/// Legal displacement range for a sized branch. Long branches are
/// unrestricted.
pub fn branch_in_range(size: Size, displacement: i64) -> bool {
    match size {
        Size::Byte => (-0x80..=0x7E).contains(&displacement),
        Size::Word => (-0x8000..=0x7FFE).contains(&displacement),
        Size::Long => true,
    }
}

/// Condition evaluation for the b<cc> family. `bra` is unconditional.
pub fn cond_met(mnemonic: &str, ccr: u8) -> bool {
    let z = ccr & ZERO != 0;
    let n = ccr & NEGATIVE != 0;
    let v = ccr & OVERFLOW != 0;
    match mnemonic {
        "bra" => true,
        "beq" => z,
        "bne" => !z,
        "bge" => n == v,
        "bgt" => !z && n == v,
        "ble" => z || n != v,
        "blt" => n != v,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_sets_carry_and_extend_on_wrap() {
        let (res, ccr) = add_op(1, 0xFF, 0, Size::Byte, false);
        assert_eq!(res, 0);
        assert_eq!(ccr, CARRY | EXTEND | ZERO);
    }

    #[test]
    fn add_preserves_high_bits() {
        let (res, _) = add_op(0x10, 0xAABB_CC05, 0, Size::Byte, false);
        assert_eq!(res, 0xAABB_CC15);
    }

    #[test]
    fn add_signed_overflow() {
        let (_, ccr) = add_op(0x7FFF, 0x0001, 0, Size::Word, false);
        assert!(ccr & OVERFLOW != 0);
        assert!(ccr & NEGATIVE != 0);
        assert!(ccr & CARRY == 0);
    }

    #[test]
    fn add_of_value_and_its_negation_is_zero() {
        let x: u32 = 1234;
        let neg = x.wrapping_neg();
        let (res, ccr) = add_op(neg, x, 0, Size::Long, false);
        assert_eq!(res, 0);
        assert!(ccr & ZERO != 0);
        assert!(ccr & CARRY != 0);
    }

    #[test]
    fn sub_borrow() {
        let (res, ccr) = add_op(5, 3, 0, Size::Word, true);
        assert_eq!(res, 0xFFFE);
        assert!(ccr & CARRY != 0);
        assert!(ccr & NEGATIVE != 0);
        assert!(ccr & OVERFLOW == 0);
    }

    #[test]
    fn move_never_touches_carry_overflow_extend() {
        for v in [0u32, 1, 0x80, 0xFFFF_FFFF] {
            let (_, ccr) = move_op(v, 0, CARRY | OVERFLOW | EXTEND, Size::Long);
            assert!(ccr & CARRY == 0);
            assert!(ccr & OVERFLOW == 0);
            assert!(ccr & EXTEND != 0);
        }
    }

    #[test]
    fn move_byte_flags_from_byte_lane() {
        let (res, ccr) = move_op(0x80, 0x1111_1100, 0, Size::Byte);
        assert_eq!(res, 0x1111_1180);
        assert!(ccr & NEGATIVE != 0);
        assert!(ccr & ZERO == 0);
    }

    #[test]
    fn not_word_keeps_high_half() {
        let (res, ccr) = not_op(0xAAAA_0000, 0, Size::Word);
        assert_eq!(res, 0xAAAA_FFFF);
        assert!(ccr & NEGATIVE != 0);
    }

    #[test]
    fn clr_keeps_extend() {
        let (res, ccr) = clr_op(0xDEAD_BEEF, EXTEND | CARRY | NEGATIVE, Size::Word);
        assert_eq!(res, 0xDEAD_0000);
        assert_eq!(ccr, EXTEND | ZERO);
    }

    #[test]
    fn swap_exchanges_halves() {
        let (res, ccr) = swap_op(0x1234_8765, 0);
        assert_eq!(res, 0x8765_1234);
        assert!(ccr & NEGATIVE != 0);
    }

    #[test]
    fn ext_word_and_long() {
        let (res, _) = ext_op(0x0000_00F0, 0, Size::Word);
        assert_eq!(res, 0x0000_FFF0);
        let (res, ccr) = ext_op(0x0000_8000, 0, Size::Long);
        assert_eq!(res, 0xFFFF_8000);
        assert!(ccr & NEGATIVE != 0);
    }

    #[test]
    fn neg_of_minus_one_is_one() {
        let (res, ccr) = neg_op(0xFFFF_FFFF, 0, Size::Long);
        assert_eq!(res, 1);
        assert!(ccr & CARRY != 0);
        assert!(ccr & ZERO == 0);
    }

    #[test]
    fn neg_zero_is_zero_without_borrow() {
        let (res, ccr) = neg_op(0, 0, Size::Word);
        assert_eq!(res, 0);
        assert!(ccr & CARRY == 0);
        assert!(ccr & ZERO != 0);
    }

    #[test]
    fn lsl_carries_last_bit_out() {
        let (res, ccr) = shift_op(Shift::Lsl, 0x81, 1, 0, Size::Byte);
        assert_eq!(res, 0x02);
        assert!(ccr & CARRY != 0);
        assert!(ccr & EXTEND != 0);
    }

    #[test]
    fn zero_count_clears_carry_keeps_extend() {
        let (res, ccr) = shift_op(Shift::Lsr, 0xF0, 0, CARRY | EXTEND, Size::Byte);
        assert_eq!(res, 0xF0);
        assert!(ccr & CARRY == 0);
        assert!(ccr & EXTEND != 0);
    }

    #[test]
    fn asr_preserves_sign() {
        let (res, _) = shift_op(Shift::Asr, 0x80, 2, 0, Size::Byte);
        assert_eq!(res, 0xE0);
    }

    #[test]
    fn asl_overflow_on_sign_change() {
        let (_, ccr) = shift_op(Shift::Asl, 0x40, 1, 0, Size::Byte);
        assert!(ccr & OVERFLOW != 0);
        assert!(ccr & NEGATIVE != 0);
    }

    #[test]
    fn rotate_wraps_and_leaves_extend() {
        let (res, ccr) = shift_op(Shift::Ror, 0x01, 1, EXTEND, Size::Byte);
        assert_eq!(res, 0x80);
        assert!(ccr & CARRY != 0);
        assert!(ccr & EXTEND != 0);

        let (res, _) = shift_op(Shift::Rol, 0x8000_0001, 1, 0, Size::Long);
        assert_eq!(res, 0x0000_0003);
    }

    #[test]
    fn mul_widens_to_long() {
        let (res, ccr) = mul_op(0xFFFF, 0xFFFF, 0, true);
        assert_eq!(res, 0xFFFE_0001);
        assert!(ccr & NEGATIVE != 0);
        let (res, _) = mul_op(0xFFFF, 2, 0, false);
        assert_eq!(res, (-2i32) as u32);
    }

    #[test]
    fn div_packs_remainder_high_quotient_low() {
        let (res, ccr) = div_op(7, 100, 0, true);
        assert_eq!(res, (2 << 16) | 14);
        assert!(ccr & (CARRY | OVERFLOW | ZERO | NEGATIVE) == 0);
    }

    #[test]
    fn div_overflow_leaves_dividend() {
        let (res, ccr) = div_op(1, 0x0010_0000, CARRY, true);
        assert_eq!(res, 0x0010_0000);
        assert!(ccr & OVERFLOW != 0);
        assert!(ccr & CARRY == 0);
    }

    #[test]
    fn signed_div_negative_quotient() {
        let (res, ccr) = div_op(3, (-10i32) as u32, 0, false);
        assert_eq!(res & 0xFFFF, (-3i16) as u16 as u32);
        assert_eq!(res >> 16, (-1i16) as u16 as u32);
        assert!(ccr & NEGATIVE != 0);
    }

    #[test]
    fn cmp_restores_extend() {
        let ccr = cmp_op(1, 0, EXTEND, Size::Long);
        assert!(ccr & EXTEND != 0);
        assert!(ccr & CARRY != 0);
        let ccr = cmp_op(1, 0, 0, Size::Long);
        assert!(ccr & EXTEND == 0);
    }

    #[test]
    fn tst_clears_carry_overflow() {
        let ccr = tst_op(0, CARRY | OVERFLOW, Size::Byte);
        assert_eq!(ccr, ZERO);
    }

    #[test]
    fn branch_ranges() {
        assert!(branch_in_range(Size::Byte, 0x7E));
        assert!(!branch_in_range(Size::Byte, 0x80));
        assert!(branch_in_range(Size::Word, -0x8000));
        assert!(!branch_in_range(Size::Word, 0x8000));
        assert!(branch_in_range(Size::Long, 1 << 40));
    }

    #[test]
    fn condition_formulas() {
        assert!(cond_met("bra", 0));
        assert!(cond_met("beq", ZERO));
        assert!(!cond_met("bne", ZERO));
        assert!(cond_met("bge", NEGATIVE | OVERFLOW));
        assert!(cond_met("bgt", 0));
        assert!(!cond_met("bgt", ZERO));
        assert!(cond_met("ble", NEGATIVE));
        assert!(cond_met("blt", OVERFLOW));
        assert!(!cond_met("blt", NEGATIVE | OVERFLOW));
    }
}
