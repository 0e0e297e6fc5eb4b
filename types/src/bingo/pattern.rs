use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use super::{GRID_SIZE, PATTERN_COUNT};

/// One of the twelve lines that complete a bingo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WinningPattern {
    Row(u8),
    Column(u8),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

/// All winning patterns in evaluation order: rows, then columns, then diagonals.
pub const PATTERNS: [WinningPattern; PATTERN_COUNT] = [
    WinningPattern::Row(0),
    WinningPattern::Row(1),
    WinningPattern::Row(2),
    WinningPattern::Row(3),
    WinningPattern::Row(4),
    WinningPattern::Column(0),
    WinningPattern::Column(1),
    WinningPattern::Column(2),
    WinningPattern::Column(3),
    WinningPattern::Column(4),
    WinningPattern::Diagonal,
    WinningPattern::AntiDiagonal,
];

impl WinningPattern {
    /// Position in [PATTERNS].
    pub const fn index(&self) -> u8 {
        match self {
            WinningPattern::Row(r) => *r,
            WinningPattern::Column(c) => GRID_SIZE as u8 + *c,
            WinningPattern::Diagonal => 2 * GRID_SIZE as u8,
            WinningPattern::AntiDiagonal => 2 * GRID_SIZE as u8 + 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        PATTERNS.get(index as usize).copied()
    }

    /// The five `(row, col)` coordinates covered by this pattern.
    pub fn cells(&self) -> [(usize, usize); GRID_SIZE] {
        std::array::from_fn(|i| match self {
            WinningPattern::Row(r) => (*r as usize, i),
            WinningPattern::Column(c) => (i, *c as usize),
            WinningPattern::Diagonal => (i, i),
            WinningPattern::AntiDiagonal => (i, GRID_SIZE - 1 - i),
        })
    }
}

impl Write for WinningPattern {
    fn write(&self, writer: &mut impl BufMut) {
        self.index().write(writer);
    }
}

impl Read for WinningPattern {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        WinningPattern::from_index(value).ok_or(Error::InvalidEnum(value))
    }
}

impl FixedSize for WinningPattern {
    const SIZE: usize = 1;
}

/// A card that completed a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Winner {
    pub card_index: usize,
    pub pattern: WinningPattern,
}

impl Write for Winner {
    fn write(&self, writer: &mut impl BufMut) {
        (self.card_index as u32).write(writer);
        self.pattern.write(writer);
    }
}

impl Read for Winner {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            card_index: u32::read(reader)? as usize,
            pattern: WinningPattern::read(reader)?,
        })
    }
}

impl EncodeSize for Winner {
    fn encode_size(&self) -> usize {
        (self.card_index as u32).encode_size() + self.pattern.encode_size()
    }
}
