//! Card generation.
//!
//! Columns are filled left to right, top to bottom. Each cell draws from its
//! column's range and redraws while the value is already on the card; the
//! center cell is FREE.

use super::{BingoError, GameRng};
use bingo_types::bingo::{
    column_range, BingoCard, CardError, Cell, COLUMN_SPAN, FREE_COL, FREE_ROW, GRID_SIZE,
};

/// Redraws allowed per cell before falling back to a scan of the column.
///
/// A column consumes at most five of its fifteen values, so even the last
/// cell of a column collides with probability 4/15 per attempt.
const MAX_REDRAWS: usize = 64;

/// Generate a single card from the RNG.
///
/// Fails only if a column runs out of unused values, which a 5x5 card with
/// fifteen values per column never does.
pub fn generate_card(rng: &mut GameRng) -> Result<BingoCard, BingoError> {
    let mut rows = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
    // Bit-set of values already placed (bit n = ball n)
    let mut used: u128 = 0;

    for col in 0..GRID_SIZE {
        for row in 0..GRID_SIZE {
            if row == FREE_ROW && col == FREE_COL {
                continue;
            }
            let value = draw_unused(rng, col, used).ok_or(CardError::ColumnExhausted { col })?;
            used |= 1u128 << value;
            rows[row][col] = Cell::Number(value);
        }
    }

    Ok(BingoCard::from_rows(rows)?)
}

/// Generate `count` independent cards.
pub fn generate_cards(rng: &mut GameRng, count: usize) -> Result<Vec<BingoCard>, BingoError> {
    (0..count).map(|_| generate_card(rng)).collect()
}

/// Pick a value from the column's range that is not yet on the card, or
/// `None` if every value in the column is taken.
fn draw_unused(rng: &mut GameRng, col: usize, used: u128) -> Option<u8> {
    let range = column_range(col);
    for _ in 0..MAX_REDRAWS {
        let candidate = range.start() + rng.next_bounded(COLUMN_SPAN);
        if used & (1u128 << candidate) == 0 {
            return Some(candidate);
        }
    }
    range.clone().find(|v| used & (1u128 << v) == 0)
}
