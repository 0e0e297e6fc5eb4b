//! Ball draws without replacement.

use super::{BingoError, GameRng};
use bingo_types::bingo::{DrawnNumbers, MAX_BALL};

/// The ball machine for one round.
///
/// `pool` holds the balls still in the machine and `drawn` the ones already
/// called, in order. Every ball is in exactly one of the two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawSequencer {
    pool: Vec<u8>,
    drawn: DrawnNumbers,
}

impl Default for DrawSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSequencer {
    /// A full machine: balls 1 through 75, nothing drawn.
    pub fn new() -> Self {
        Self {
            pool: (1..=MAX_BALL).collect(),
            drawn: DrawnNumbers::new(),
        }
    }

    /// Resume a machine from an existing draw history.
    pub fn from_drawn(drawn: DrawnNumbers) -> Self {
        let pool = (1..=MAX_BALL).filter(|ball| !drawn.contains(*ball)).collect();
        Self { pool, drawn }
    }

    /// Draw the next ball uniformly from the balls left in the machine.
    ///
    /// Fails with [BingoError::ExhaustedPool] once all 75 balls are out; the
    /// sequencer is left untouched in that case.
    pub fn draw_next(&mut self, rng: &mut GameRng) -> Result<u8, BingoError> {
        if self.pool.is_empty() {
            return Err(BingoError::ExhaustedPool);
        }
        let idx = rng.next_bounded(self.pool.len() as u8) as usize;
        let ball = self.pool[idx];
        self.drawn.push(ball)?;
        self.pool.swap_remove(idx);
        Ok(ball)
    }

    pub fn drawn(&self) -> &DrawnNumbers {
        &self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }

    /// Consume the machine, keeping only the history.
    pub fn into_drawn(self) -> DrawnNumbers {
        self.drawn
    }
}
