use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadRangeExt, Write};
use thiserror::Error as ThisError;

use super::MAX_BALL;

/// Reasons a ball cannot be appended to the draw history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum DrawError {
    #[error("ball {0} is outside 1..=75")]
    OutOfRange(u8),
    #[error("ball {0} was already drawn")]
    AlreadyDrawn(u8),
}

/// Balls drawn in the current round, oldest first.
///
/// Append-only: numbers are in `1..=75`, never repeat, and the order is the
/// order they came out of the machine. A bit-set mirrors the sequence so
/// membership checks don't scan the history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawnNumbers {
    sequence: Vec<u8>,
    marked: u128,
}

impl DrawnNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ball: u8) -> Result<(), DrawError> {
        if ball == 0 || ball > MAX_BALL {
            return Err(DrawError::OutOfRange(ball));
        }
        if self.contains(ball) {
            return Err(DrawError::AlreadyDrawn(ball));
        }
        self.sequence.push(ball);
        self.marked |= 1u128 << ball;
        Ok(())
    }

    pub fn contains(&self, ball: u8) -> bool {
        ball <= MAX_BALL && self.marked & (1u128 << ball) != 0
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Every ball has been drawn.
    pub fn is_complete(&self) -> bool {
        self.sequence.len() == MAX_BALL as usize
    }

    pub fn last(&self) -> Option<u8> {
        self.sequence.last().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.sequence
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.sequence.iter().copied()
    }
}

impl TryFrom<&[u8]> for DrawnNumbers {
    type Error = DrawError;

    fn try_from(balls: &[u8]) -> Result<Self, Self::Error> {
        let mut drawn = Self::new();
        for &ball in balls {
            drawn.push(ball)?;
        }
        Ok(drawn)
    }
}

impl Write for DrawnNumbers {
    fn write(&self, writer: &mut impl BufMut) {
        self.sequence.write(writer);
    }
}

impl Read for DrawnNumbers {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let sequence = Vec::<u8>::read_range(reader, 0..=MAX_BALL as usize)?;
        DrawnNumbers::try_from(sequence.as_slice())
            .map_err(|_| Error::Invalid("DrawnNumbers", "invalid draw history"))
    }
}

impl EncodeSize for DrawnNumbers {
    fn encode_size(&self) -> usize {
        self.sequence.encode_size()
    }
}
