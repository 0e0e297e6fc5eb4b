//! Card-count multiplier.

use bingo_types::bingo::MULTIPLIER_DISPLAY_CAP;

/// Payout multiplier for playing `card_count` cards: `max(1, log2(n) + 1)`.
///
/// One card plays at exactly 1x. The value is not capped; only the table
/// gauge (see [gauge_fill]) stops at [MULTIPLIER_DISPLAY_CAP].
pub fn multiplier(card_count: u32) -> f64 {
    (f64::from(card_count).log2() + 1.0).max(1.0)
}

/// Fraction of the multiplier gauge to light, in `[0, 1]`.
pub fn gauge_fill(multiplier: f64) -> f64 {
    (multiplier / MULTIPLIER_DISPLAY_CAP).clamp(0.0, 1.0)
}
