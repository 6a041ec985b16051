use fxhash::FxHashMap;

use crate::symbol::Size;

/// Upper bound of the addressable space (31-bit, inclusive).
pub const ADDRESS_MAX: i64 = 0x7FFF_FFFF;

/// Sparse byte-addressable RAM. Cells that were never written read as zero.
/// Multi-byte accessors compose big-endian: most significant byte at the
/// lowest address.
#[derive(Clone, Default, Debug)]
pub struct Memory {
    cells: FxHashMap<u32, u8>,
}

impl Memory {
    pub fn new() -> Self {
        Memory { cells: FxHashMap::default() }
    }

    /// Bounds check. Callers validate before using the typed accessors;
    /// the accessors themselves never clamp.
    pub fn is_valid_address(addr: i64) -> bool {
        (0..=ADDRESS_MAX).contains(&addr)
    }

    pub fn get_byte(&self, addr: u32) -> u8 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    pub fn get_word(&self, addr: u32) -> u16 {
        u16::from(self.get_byte(addr)) << 8 | u16::from(self.get_byte(addr + 1))
    }

    pub fn get_long(&self, addr: u32) -> u32 {
        u32::from(self.get_byte(addr)) << 24
            | u32::from(self.get_byte(addr + 1)) << 16
            | u32::from(self.get_byte(addr + 2)) << 8
            | u32::from(self.get_byte(addr + 3))
    }

    /// Stores the low byte of `value`.
    pub fn set_byte(&mut self, addr: u32, value: u32) {
        self.cells.insert(addr, value as u8);
    }

    pub fn set_word(&mut self, addr: u32, value: u32) {
        self.set_byte(addr, value >> 8);
        self.set_byte(addr + 1, value);
    }

    pub fn set_long(&mut self, addr: u32, value: u32) {
        self.set_byte(addr, value >> 24);
        self.set_byte(addr + 1, value >> 16);
        self.set_byte(addr + 2, value >> 8);
        self.set_byte(addr + 3, value);
    }

    /// Sized read, value in the low bits.
    pub fn get(&self, addr: u32, size: Size) -> u32 {
        match size {
            Size::Byte => u32::from(self.get_byte(addr)),
            Size::Word => u32::from(self.get_word(addr)),
            Size::Long => self.get_long(addr),
        }
    }

    pub fn set(&mut self, addr: u32, value: u32, size: Size) {
        match size {
            Size::Byte => self.set_byte(addr, value),
            Size::Word => self.set_word(addr, value),
            Size::Long => self.set_long(addr, value),
        }
    }

    /// Independent copy of the whole map for the undo mechanism. Structural
    /// sharing is forbidden: later writes must not alter a stored frame.
    pub fn snapshot(&self) -> FxHashMap<u32, u8> {
        self.cells.clone()
    }

    pub fn restore(&mut self, snapshot: FxHashMap<u32, u8>) {
        self.cells = snapshot;
    }

    /// View of the touched cells, for display.
    pub fn cells(&self) -> &FxHashMap<u32, u8> {
        &self.cells
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_round_trip_mod_256() {
        let mut mem = Memory::new();
        for v in [0u32, 1, 0x7F, 0xFF, 0x100, 0x1FF, 0xDEAD_BEEF] {
            mem.set_byte(0x1000, v);
            assert_eq!(u32::from(mem.get_byte(0x1000)), v & 0xFF);
        }
    }

    #[test]
    fn unset_reads_zero() {
        let mem = Memory::new();
        assert_eq!(mem.get_byte(0), 0);
        assert_eq!(mem.get_long(0x7FFF_0000), 0);
    }

    #[test]
    fn long_is_big_endian() {
        let mut mem = Memory::new();
        mem.set_long(0x2000, 0x1234_5678);
        assert_eq!(mem.get_byte(0x2000), 0x12);
        assert_eq!(mem.get_byte(0x2001), 0x34);
        assert_eq!(mem.get_byte(0x2002), 0x56);
        assert_eq!(mem.get_byte(0x2003), 0x78);
        assert_eq!(mem.get_long(0x2000), 0x1234_5678);
    }

    #[test]
    fn word_round_trip() {
        let mut mem = Memory::new();
        mem.set_word(0x3000, 0xABCD_EF01);
        assert_eq!(mem.get_word(0x3000), 0xEF01);
        assert_eq!(mem.get_byte(0x3000), 0xEF);
    }

    #[test]
    fn sized_set_dispatch() {
        let mut mem = Memory::new();
        mem.set(0x10, 0x1122_3344, Size::Word);
        assert_eq!(mem.get_word(0x10), 0x3344);
        assert_eq!(mem.get_byte(0x12), 0);
        assert_eq!(mem.get(0x10, Size::Word), 0x3344);
        mem.set(0x20, 0xFF, Size::Byte);
        assert_eq!(mem.get_byte(0x20), 0xFF);
        assert_eq!(mem.get(0x20, Size::Byte), 0xFF);
    }

    #[test]
    fn address_bounds() {
        assert!(Memory::is_valid_address(0));
        assert!(Memory::is_valid_address(0x7FFF_FFFF));
        assert!(!Memory::is_valid_address(-1));
        assert!(!Memory::is_valid_address(0x8000_0000));
    }

    #[test]
    fn snapshot_is_independent() {
        let mut mem = Memory::new();
        mem.set_byte(5, 0xAA);
        let snap = mem.snapshot();
        mem.set_byte(5, 0xBB);
        assert_eq!(snap.get(&5).copied(), Some(0xAA));
        mem.restore(snap);
        assert_eq!(mem.get_byte(5), 0xAA);
    }
}
