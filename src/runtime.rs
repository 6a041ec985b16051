//! The execution engine. `Emulator::new` assembles the program and seeds
//! the machine; `step` executes one instruction cell per call and reports
//! whether the program has finished.
//!
//! Failures never surface as `Err`: a fatal condition parks an `Exception`
//! that halts the machine for good, while recoverable mistakes append a
//! `RuntimeError` and execution carries on at the next cell.

use crate::asm::{self, Row};
use crate::memory::Memory;
use crate::ops::{self, Shift};
use crate::parse::{
    self, parse_literal, parse_mnemonic, parse_operand, Operand, DATA_BASE, SP,
};
use crate::symbol::{ErrorKind, Exception, FxMap, LabelValue, RuntimeError, Size};
use crate::undo::{Frame, Undo};

pub const LAST_INSTRUCTION_DEFAULT: &str = "Most recent instruction will be shown here.";

/// A resolved destination: a register file slot or a memory address.
enum Place {
    Reg(usize),
    Mem(u32),
}

pub struct Emulator {
    pc: i64,
    line: usize,
    ccr: u8,
    registers: [u32; 16],
    memory: Memory,
    undo: Undo,
    rows: Vec<Row>,
    source: Vec<String>,
    labels: FxMap<String, LabelValue>,
    last_instruction: String,
    exception: Option<Exception>,
    errors: Vec<RuntimeError>,
}

impl Emulator {
    pub fn new(text: &str) -> Self {
        let program = asm::assemble(text);
        let mut emulator = Emulator {
            pc: 0,
            line: 0,
            ccr: 0,
            registers: [0; 16],
            memory: program.memory,
            undo: Undo::new(),
            rows: program.rows,
            source: program.source,
            labels: program.labels,
            last_instruction: LAST_INSTRUCTION_DEFAULT.to_string(),
            exception: program.exception,
            errors: Vec::new(),
        };
        if emulator.exception.is_none() {
            emulator.push_frame();
        }
        emulator
    }

    pub fn pc(&self) -> i64 {
        self.pc
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn ccr(&self) -> u8 {
        self.ccr
    }

    pub fn registers(&self) -> &[u32; 16] {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn labels(&self) -> &FxMap<String, LabelValue> {
        &self.labels
    }

    pub fn exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    pub fn errors(&self) -> &[RuntimeError] {
        &self.errors
    }

    /// Source text of the most recently fetched line, as written.
    pub fn last_instruction(&self) -> &str {
        &self.last_instruction
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Executes one instruction cell. Returns true once the program is
    /// finished, either by running off the end of the program or by a
    /// fatal exception.
    pub fn step(&mut self) -> bool {
        if self.exception.is_some() {
            return true;
        }
        if self.pc / 4 >= self.rows.len() as i64 {
            if let Some(row) = self.rows.last() {
                self.last_instruction = self
                    .source
                    .get(row.line.saturating_sub(1))
                    .cloned()
                    .unwrap_or_else(|| row.text.clone());
            }
            return true;
        }
        if self.pc < 0 || self.pc % 4 != 0 {
            self.exception = Some(Exception::InvalidPc(self.pc));
            return true;
        }

        if self.pc != 0 {
            self.push_frame();
        }

        let row = self.rows[(self.pc / 4) as usize].clone();
        self.line = row.line;
        self.last_instruction = self
            .source
            .get(row.line.saturating_sub(1))
            .cloned()
            .unwrap_or_else(|| row.text.clone());
        self.pc += 4;

        // Labels, directives, and expanded data rows occupy a cell but do
        // nothing when fetched.
        if row.resolved {
            return false;
        }

        self.execute(&row.text);
        self.exception.is_some()
    }

    /// Restores the most recent frame, exactly inverting one `step`.
    pub fn undo_from_stack(&mut self) {
        if let Some(frame) = self.undo.pop() {
            self.pc = frame.pc;
            self.ccr = frame.ccr;
            self.registers = frame.registers;
            self.memory.restore(frame.memory);
            self.errors = frame.errors;
            self.last_instruction = frame.last_instruction;
            self.line = frame.line;
        }
    }

    fn push_frame(&mut self) {
        self.undo.push(Frame {
            pc: self.pc,
            ccr: self.ccr,
            registers: self.registers,
            memory: self.memory.snapshot(),
            errors: self.errors.clone(),
            last_instruction: self.last_instruction.clone(),
            line: self.line,
        });
    }

    fn error(&mut self, kind: ErrorKind) {
        self.errors.push(RuntimeError { kind, line: self.line });
    }

    fn execute(&mut self, text: &str) {
        let head = text.split_whitespace().next().unwrap_or(text);
        let (mnemonic, size, size_ok) = parse_mnemonic(head);
        if !size_ok {
            self.error(ErrorKind::InvalidOpSize);
        }

        if parse::takes_no_operands(mnemonic) {
            self.rts();
            return;
        }

        let Some((_, tail)) = text.split_once(' ') else {
            self.error(ErrorKind::UnrecognisedInstruction);
            return;
        };
        let raw: Vec<&str> = tail.split(',').map(str::trim).collect();

        // Control flow keeps its operand textual: by now it is either a
        // displacement the link phase produced or a literal.
        if parse::is_jump(mnemonic) || parse::is_branch(mnemonic) {
            if raw.len() != 1 {
                self.error(ErrorKind::WrongArity { expected: 1 });
                return;
            }
            match mnemonic {
                "jmp" => self.jmp(raw[0]),
                "jsr" => {
                    if self.push_return() {
                        self.jmp(raw[0]);
                    }
                }
                "bsr" => {
                    if self.push_return() {
                        self.branch("bra", "bsr", size, raw[0]);
                    }
                }
                _ => self.branch(mnemonic, branch_name(mnemonic), size, raw[0]),
            }
            return;
        }

        let expected = match mnemonic {
            "swap" | "clr" | "not" | "neg" | "ext" | "tst" => 1,
            "add" | "addi" | "adda" | "sub" | "subi" | "suba" | "move" | "movea" | "mulu"
            | "muls" | "divu" | "divs" | "exg" | "and" | "andi" | "or" | "ori" | "eor"
            | "eori" | "lsl" | "lsr" | "asl" | "asr" | "rol" | "ror" | "cmp" | "cmpa"
            | "cmpi" => 2,
            _ => {
                self.error(ErrorKind::UnrecognisedInstruction);
                return;
            }
        };
        if raw.len() != expected {
            self.error(ErrorKind::WrongArity { expected });
            return;
        }

        let mut operands = Vec::with_capacity(raw.len());
        for token in &raw {
            match parse_operand(token) {
                Ok(operand) => operands.push(operand),
                Err(kind) => {
                    self.error(kind);
                    return;
                }
            }
        }

        match (mnemonic, operands.as_slice()) {
            ("add", &[a, b]) => self.add(size, a, b, false),
            ("sub", &[a, b]) => self.add(size, a, b, true),
            ("addi", &[a, b]) => self.addi(size, a, b, false),
            ("subi", &[a, b]) => self.addi(size, a, b, true),
            ("adda", &[a, b]) => self.adda(size, a, b, false),
            ("suba", &[a, b]) => self.adda(size, a, b, true),
            ("move", &[a, b]) => self.mv(size, a, b),
            ("movea", &[a, b]) => self.movea(size, a, b),
            ("mulu", &[a, b]) => self.mul(a, b, true),
            ("muls", &[a, b]) => self.mul(a, b, false),
            ("divu", &[a, b]) => self.div(a, b, true),
            ("divs", &[a, b]) => self.div(a, b, false),
            ("swap", &[a]) => self.swap(a),
            ("exg", &[a, b]) => self.exg(a, b),
            ("clr", &[a]) => self.unary(size, a, "clr"),
            ("not", &[a]) => self.unary(size, a, "not"),
            ("neg", &[a]) => self.unary(size, a, "neg"),
            ("ext", &[a]) => self.ext(size, a),
            ("and", &[a, b]) => self.logic(size, a, b, "and"),
            ("or", &[a, b]) => self.logic(size, a, b, "or"),
            ("eor", &[a, b]) => self.logic(size, a, b, "eor"),
            ("andi", &[a, b]) => self.logic_immediate(size, a, b, "andi"),
            ("ori", &[a, b]) => self.logic_immediate(size, a, b, "ori"),
            ("eori", &[a, b]) => self.logic_immediate(size, a, b, "eori"),
            ("lsl", &[a, b]) => self.shift(Shift::Lsl, "lsl", size, a, b),
            ("lsr", &[a, b]) => self.shift(Shift::Lsr, "lsr", size, a, b),
            ("asl", &[a, b]) => self.shift(Shift::Asl, "asl", size, a, b),
            ("asr", &[a, b]) => self.shift(Shift::Asr, "asr", size, a, b),
            ("rol", &[a, b]) => self.shift(Shift::Rol, "rol", size, a, b),
            ("ror", &[a, b]) => self.shift(Shift::Ror, "ror", size, a, b),
            ("cmp", &[a, b]) => self.cmp(size, a, b, "cmp"),
            ("cmpa", &[a, b]) => self.cmp(size, a, b, "cmpa"),
            ("cmpi", &[a, b]) => self.cmp(size, a, b, "cmpi"),
            ("tst", &[a]) => self.tst(size, a),
            _ => self.error(ErrorKind::UnrecognisedInstruction),
        }
    }

    /* Operand plumbing */

    fn effective_address(&mut self, reg: usize, offset: i64) -> Option<u32> {
        let address = i64::from(self.registers[reg]) + offset;
        if !Memory::is_valid_address(address) {
            self.error(ErrorKind::InvalidAddress);
            return None;
        }
        Some(address as u32)
    }

    fn place(&mut self, operand: Operand) -> Option<Place> {
        match operand {
            Operand::DataReg(d) => Some(Place::Reg(DATA_BASE + d)),
            Operand::AddrReg(a) => Some(Place::Reg(a)),
            Operand::Absolute(address) => {
                if !Memory::is_valid_address(address) {
                    self.error(ErrorKind::InvalidAddress);
                    return None;
                }
                Some(Place::Mem(address as u32))
            }
            Operand::Indirect { reg, offset } => {
                self.effective_address(reg, offset).map(Place::Mem)
            }
            Operand::Immediate(_) => None,
        }
    }

    /// Operand value in the low bits. Registers are read whole; the flag
    /// helpers mask to size and splice.
    fn load(&mut self, operand: Operand, size: Size) -> Option<u32> {
        match operand {
            Operand::Immediate(value) => Some(value as u32),
            other => match self.place(other)? {
                Place::Reg(slot) => Some(self.registers[slot]),
                Place::Mem(address) => Some(self.memory.get(address, size)),
            },
        }
    }

    fn read_place(&self, place: &Place, size: Size) -> u32 {
        match place {
            Place::Reg(slot) => self.registers[*slot],
            Place::Mem(address) => self.memory.get(*address, size),
        }
    }

    fn store(&mut self, place: Place, value: u32, size: Size) {
        match place {
            Place::Reg(slot) => self.registers[slot] = value,
            Place::Mem(address) => self.memory.set(address, value, size),
        }
    }

    /// Shared read-modify-write path for the two-operand ALU families.
    fn apply2(
        &mut self,
        size: Size,
        src: Operand,
        dst: Operand,
        f: impl Fn(u32, u32, u8, Size) -> (u32, u8),
    ) {
        let Some(src_value) = self.load(src, size) else { return };
        let Some(place) = self.place(dst) else { return };
        let dst_value = self.read_place(&place, size);
        let (result, ccr) = f(src_value, dst_value, self.ccr, size);
        self.store(place, result, size);
        self.ccr = ccr;
    }

    /* Instruction families */

    fn add(&mut self, size: Size, src: Operand, dst: Operand, is_sub: bool) {
        use Operand::*;
        match (src, dst) {
            (AddrReg(_), AddrReg(_))
            | (Indirect { .. }, Indirect { .. })
            | (Absolute(_), Absolute(_)) => self.error(ErrorKind::MemoryToMemory),
            (_, AddrReg(_)) => self.adda(size, src, dst, is_sub),
            (Immediate(_), _) => self.addi(size, src, dst, is_sub),
            (AddrReg(_) | DataReg(_) | Absolute(_) | Indirect { .. }, DataReg(_))
            | (DataReg(_), Absolute(_) | Indirect { .. }) => {
                self.apply2(size, src, dst, |s, d, c, z| ops::add_op(s, d, c, z, is_sub));
            }
            _ => self.error(ErrorKind::IllegalCombination(if is_sub { "sub" } else { "add" })),
        }
    }

    fn addi(&mut self, size: Size, src: Operand, dst: Operand, is_sub: bool) {
        use Operand::*;
        match (src, dst) {
            (Immediate(_), DataReg(_) | Absolute(_) | Indirect { .. }) => {
                self.apply2(size, src, dst, |s, d, c, z| ops::add_op(s, d, c, z, is_sub));
            }
            _ => self.error(ErrorKind::IllegalCombination(if is_sub { "subi" } else { "addi" })),
        }
    }

    fn adda(&mut self, size: Size, src: Operand, dst: Operand, is_sub: bool) {
        if !matches!(dst, Operand::AddrReg(_)) {
            self.error(ErrorKind::IllegalCombination(if is_sub { "suba" } else { "adda" }));
            return;
        }
        self.apply2(size, src, dst, |s, d, c, z| ops::add_op(s, d, c, z, is_sub));
    }

    fn mv(&mut self, size: Size, src: Operand, dst: Operand) {
        match (src, dst) {
            (_, Operand::AddrReg(_)) => self.movea(size, src, dst),
            _ if src.is_memory() && dst.is_memory() => self.error(ErrorKind::MemoryToMemory),
            (_, Operand::Immediate(_)) => self.error(ErrorKind::IllegalCombination("move")),
            _ => self.apply2(size, src, dst, ops::move_op),
        }
    }

    /// Loads an address register without touching the CCR. `.w` sign
    /// extends into the full register.
    fn movea(&mut self, size: Size, src: Operand, dst: Operand) {
        let Operand::AddrReg(reg) = dst else {
            self.error(ErrorKind::IllegalCombination("movea"));
            return;
        };
        let Some(value) = self.load(src, size) else { return };
        match size {
            Size::Long => self.registers[reg] = value,
            Size::Word => self.registers[reg] = value as u16 as i16 as i32 as u32,
            Size::Byte => self.error(ErrorKind::InvalidOpSize),
        }
    }

    fn mul(&mut self, src: Operand, dst: Operand, unsigned: bool) {
        use Operand::*;
        match (src, dst) {
            (AddrReg(_), AddrReg(_)) | (Indirect { .. }, Indirect { .. }) => {
                self.error(ErrorKind::MemoryToMemory);
            }
            (DataReg(_) | Immediate(_) | Absolute(_) | Indirect { .. }, DataReg(d)) => {
                let Some(src_value) = self.load(src, Size::Word) else { return };
                let slot = DATA_BASE + d;
                let (result, ccr) =
                    ops::mul_op(src_value, self.registers[slot], self.ccr, unsigned);
                self.registers[slot] = result;
                self.ccr = ccr;
            }
            _ => self.error(ErrorKind::IllegalCombination(if unsigned { "mulu" } else { "muls" })),
        }
    }

    fn div(&mut self, src: Operand, dst: Operand, unsigned: bool) {
        use Operand::*;
        match (src, dst) {
            (AddrReg(_), AddrReg(_)) | (Indirect { .. }, Indirect { .. }) => {
                self.error(ErrorKind::MemoryToMemory);
            }
            (DataReg(_) | Immediate(_) | Absolute(_) | Indirect { .. }, DataReg(d)) => {
                let Some(src_value) = self.load(src, Size::Word) else { return };
                // The divisor is the low word of the resolved source.
                if src_value & 0xFFFF == 0 {
                    self.exception = Some(Exception::DivisionByZero { line: self.line });
                    return;
                }
                let slot = DATA_BASE + d;
                let (result, ccr) =
                    ops::div_op(src_value, self.registers[slot], self.ccr, unsigned);
                self.registers[slot] = result;
                self.ccr = ccr;
            }
            _ => self.error(ErrorKind::IllegalCombination(if unsigned { "divu" } else { "divs" })),
        }
    }

    fn swap(&mut self, operand: Operand) {
        let Operand::DataReg(d) = operand else {
            self.error(ErrorKind::DataOnlySwap);
            return;
        };
        let slot = DATA_BASE + d;
        let (result, ccr) = ops::swap_op(self.registers[slot], self.ccr);
        self.registers[slot] = result;
        self.ccr = ccr;
    }

    fn exg(&mut self, a: Operand, b: Operand) {
        if !a.is_register() || !b.is_register() {
            self.error(ErrorKind::ExgRestrictions);
            return;
        }
        let slot = |op: Operand| match op {
            Operand::DataReg(d) => DATA_BASE + d,
            Operand::AddrReg(r) => r,
            _ => unreachable!(),
        };
        self.registers.swap(slot(a), slot(b));
    }

    fn unary(&mut self, size: Size, operand: Operand, which: &'static str) {
        use Operand::*;
        match operand {
            DataReg(_) | Absolute(_) | Indirect { .. } => {
                let Some(place) = self.place(operand) else { return };
                let value = self.read_place(&place, size);
                let (result, ccr) = match which {
                    "clr" => ops::clr_op(value, self.ccr, size),
                    "not" => ops::not_op(value, self.ccr, size),
                    _ => ops::neg_op(value, self.ccr, size),
                };
                self.store(place, result, size);
                self.ccr = ccr;
            }
            _ => self.error(match which {
                "clr" => ErrorKind::ClrOnAddress,
                "not" => ErrorKind::NotOnAddress,
                _ => ErrorKind::NegOnAddress,
            }),
        }
    }

    fn ext(&mut self, size: Size, operand: Operand) {
        if size == Size::Byte {
            self.error(ErrorKind::ExtOnByte);
            return;
        }
        let Operand::DataReg(d) = operand else {
            self.error(ErrorKind::DataOnlyExt);
            return;
        };
        let slot = DATA_BASE + d;
        let (result, ccr) = ops::ext_op(self.registers[slot], self.ccr, size);
        self.registers[slot] = result;
        self.ccr = ccr;
    }

    fn logic(&mut self, size: Size, src: Operand, dst: Operand, which: &'static str) {
        use Operand::*;
        let f = logic_op(which);
        match (src, dst) {
            (AddrReg(_), AddrReg(_)) | (Indirect { .. }, Indirect { .. }) => {
                self.error(ErrorKind::MemoryToMemory);
            }
            (Immediate(_), _) => self.logic_immediate(size, src, dst, which),
            (DataReg(_), DataReg(_) | Absolute(_) | Indirect { .. }) => {
                self.apply2(size, src, dst, f);
            }
            // eor cannot read its source from memory.
            (Absolute(_) | Indirect { .. }, DataReg(_)) if which != "eor" => {
                self.apply2(size, src, dst, f);
            }
            _ => self.error(ErrorKind::IllegalCombination(which)),
        }
    }

    fn logic_immediate(&mut self, size: Size, src: Operand, dst: Operand, which: &'static str) {
        use Operand::*;
        let f = logic_op(which.trim_end_matches('i'));
        match (src, dst) {
            (Immediate(_), DataReg(_) | Absolute(_) | Indirect { .. }) => {
                self.apply2(size, src, dst, f);
            }
            _ => self.error(ErrorKind::IllegalCombination(which)),
        }
    }

    fn shift(&mut self, kind: Shift, name: &'static str, size: Size, count: Operand, dst: Operand) {
        use Operand::*;
        match (count, dst) {
            (Immediate(n), DataReg(_)) => {
                if !(0..=8).contains(&n) {
                    self.error(ErrorKind::ImmediateShiftRange);
                    return;
                }
                self.shift_apply(kind, size, n as u32, dst);
            }
            (Immediate(n), d) if d.is_memory() => {
                if !(0..=1).contains(&n) {
                    self.error(ErrorKind::MemoryShiftCount);
                    return;
                }
                if size != Size::Word {
                    self.error(ErrorKind::MemoryShiftWordOnly);
                    return;
                }
                self.shift_apply(kind, size, n as u32, d);
            }
            (DataReg(r), d) if d.is_memory() => {
                let n = self.registers[DATA_BASE + r];
                if n > 1 {
                    self.error(ErrorKind::MemoryShiftCount);
                    return;
                }
                if size != Size::Word {
                    self.error(ErrorKind::MemoryShiftWordOnly);
                    return;
                }
                self.shift_apply(kind, size, n, d);
            }
            (DataReg(r), DataReg(_)) => {
                let ceiling = match size {
                    Size::Byte => 8,
                    Size::Word => 16,
                    Size::Long => 31,
                };
                let n = self.registers[DATA_BASE + r].min(ceiling);
                self.shift_apply(kind, size, n, dst);
            }
            _ => self.error(ErrorKind::IllegalCombination(name)),
        }
    }

    fn shift_apply(&mut self, kind: Shift, size: Size, count: u32, dst: Operand) {
        let Some(place) = self.place(dst) else { return };
        let value = self.read_place(&place, size);
        let (result, ccr) = ops::shift_op(kind, value, count, self.ccr, size);
        self.store(place, result, size);
        self.ccr = ccr;
    }

    fn cmp(&mut self, size: Size, src: Operand, dst: Operand, which: &'static str) {
        use Operand::*;
        if which == "cmpa" && !matches!(dst, AddrReg(_)) {
            self.error(ErrorKind::IllegalCombination("cmpa"));
            return;
        }
        if which == "cmpi" && !matches!(src, Immediate(_)) {
            self.error(ErrorKind::IllegalCombination("cmpi"));
            return;
        }
        match (src, dst) {
            (_, AddrReg(a)) => {
                let Some(src_value) = self.load(src, size) else { return };
                self.ccr = ops::cmp_op(src_value, self.registers[a], self.ccr, size);
            }
            (Immediate(value), DataReg(_) | Absolute(_) | Indirect { .. }) => {
                let Some(place) = self.place(dst) else { return };
                let dst_value = self.read_place(&place, size);
                self.ccr = ops::cmp_op(value as u32, dst_value, self.ccr, size);
            }
            (DataReg(_) | AddrReg(_) | Absolute(_) | Indirect { .. }, DataReg(d)) => {
                let Some(src_value) = self.load(src, size) else { return };
                self.ccr =
                    ops::cmp_op(src_value, self.registers[DATA_BASE + d], self.ccr, size);
            }
            _ => self.error(ErrorKind::IllegalCombination(which)),
        }
    }

    fn tst(&mut self, size: Size, operand: Operand) {
        use Operand::*;
        match operand {
            DataReg(_) | Absolute(_) | Indirect { .. } => {
                let Some(value) = self.load(operand, size) else { return };
                self.ccr = ops::tst_op(value, self.ccr, size);
            }
            _ => self.error(ErrorKind::IllegalCombination("tst")),
        }
    }

    /* Control flow */

    fn jmp(&mut self, operand: &str) {
        match parse_literal(operand) {
            Some(displacement) => self.pc += displacement,
            None => self.error(ErrorKind::UnknownOperand),
        }
    }

    fn branch(&mut self, cond: &str, name: &'static str, size: Size, operand: &str) {
        let Some(displacement) = parse_literal(operand) else {
            self.error(ErrorKind::UnknownOperand);
            return;
        };
        if !ops::cond_met(cond, self.ccr) {
            return;
        }
        if !ops::branch_in_range(size, displacement) {
            self.error(ErrorKind::OffsetTooLong(name));
            return;
        }
        self.pc += displacement;
    }

    /// The software stack at a7 grows upward: bump, then store. An a7 that
    /// would place any byte of the return address outside the address space
    /// records an error and leaves a7 and memory untouched; the caller
    /// skips the jump.
    fn push_return(&mut self) -> bool {
        let slot = i64::from(self.registers[SP]) + 4;
        if !Memory::is_valid_address(slot) || !Memory::is_valid_address(slot + 3) {
            self.error(ErrorKind::InvalidAddress);
            return false;
        }
        self.registers[SP] = self.registers[SP].wrapping_add(4);
        self.memory.set_long(self.registers[SP], self.pc as u32);
        true
    }

    fn rts(&mut self) {
        let slot = i64::from(self.registers[SP]);
        if !Memory::is_valid_address(slot) || !Memory::is_valid_address(slot + 3) {
            self.error(ErrorKind::InvalidAddress);
            return;
        }
        self.pc = i64::from(self.memory.get_long(self.registers[SP]));
        self.registers[SP] = self.registers[SP].wrapping_sub(4);
    }
}

fn logic_op(which: &str) -> fn(u32, u32, u8, Size) -> (u32, u8) {
    match which {
        "and" => ops::and_op,
        "or" => ops::or_op,
        _ => ops::eor_op,
    }
}

fn branch_name(mnemonic: &str) -> &'static str {
    match mnemonic {
        "bra" => "bra",
        "beq" => "beq",
        "bne" => "bne",
        "bge" => "bge",
        "bgt" => "bgt",
        "ble" => "ble",
        _ => "blt",
    }
}
