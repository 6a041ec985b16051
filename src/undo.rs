use fxhash::FxHashMap;

use crate::symbol::RuntimeError;

/// One recorded machine state. Every field is an owned deep copy; popping a
/// frame must restore the machine exactly, regardless of what ran since.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pc: i64,
    pub ccr: u8,
    pub registers: [u32; 16],
    pub memory: FxHashMap<u32, u8>,
    pub errors: Vec<RuntimeError>,
    pub last_instruction: String,
    pub line: usize,
}

/// Unbounded LIFO of machine snapshots. One frame is pushed before each
/// executed instruction, plus a baseline frame at construction.
#[derive(Default, Debug)]
pub struct Undo {
    frames: Vec<Frame>,
}

impl Undo {
    pub fn new() -> Self {
        Undo { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn peek(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn frame(pc: i64) -> Frame {
        Frame {
            pc,
            ccr: 0,
            registers: [0; 16],
            memory: FxHashMap::default(),
            errors: Vec::new(),
            last_instruction: String::new(),
            line: 0,
        }
    }

    #[test]
    fn pops_in_reverse_order() {
        let mut undo = Undo::new();
        undo.push(frame(0));
        undo.push(frame(4));
        undo.push(frame(8));
        assert_eq!(undo.len(), 3);
        assert_eq!(undo.pop().unwrap().pc, 8);
        assert_eq!(undo.peek().unwrap().pc, 4);
        assert_eq!(undo.pop().unwrap().pc, 4);
        assert_eq!(undo.pop().unwrap().pc, 0);
        assert!(undo.pop().is_none());
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut undo = Undo::new();
        undo.push(frame(0));
        undo.clear();
        assert!(undo.is_empty());
    }
}
