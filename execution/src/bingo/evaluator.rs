//! Winning-pattern detection.
//!
//! Evaluation is stateless and always runs over the full draw history, so it
//! can be called after every ball.

use bingo_types::bingo::{BingoCard, DrawnNumbers, Winner, WinningPattern, PATTERNS};

/// First pattern (rows, then columns, then diagonals) the card has completed.
pub fn first_pattern(card: &BingoCard, drawn: &DrawnNumbers) -> Option<WinningPattern> {
    PATTERNS.iter().copied().find(|pattern| {
        pattern
            .cells()
            .iter()
            .all(|&(row, col)| card.is_marked(row, col, drawn))
    })
}

/// Winning cards, in card order, each with the first pattern it completed.
///
/// A card reports a single pattern even when several are complete. Cards
/// without a complete pattern are left out.
pub fn evaluate(cards: &[BingoCard], drawn: &DrawnNumbers) -> Vec<Winner> {
    cards
        .iter()
        .enumerate()
        .filter_map(|(card_index, card)| {
            first_pattern(card, drawn).map(|pattern| Winner {
                card_index,
                pattern,
            })
        })
        .collect()
}
