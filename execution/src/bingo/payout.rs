//! Win and jackpot settlement.
//!
//! Balances and the jackpot are whole chips. Anything smaller (the 10%
//! jackpot contribution of a small stake, the fractional part of a multiplied
//! payout) is kept in [CHIP_FRACTION] units and carried until it adds up to a
//! chip, so nothing is lost to rounding across rounds.

use super::BingoError;
use bingo_types::bingo::{
    Winner, CHIP_FRACTION, JACKPOT_CONTRIBUTION_BPS, JACKPOT_SEED, JACKPOT_THRESHOLD,
    PAYOUT_FACTOR,
};

const BPS_DENOMINATOR: u64 = 10_000;

/// Which branch a settlement took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Base payout only; jackpot untouched.
    Win,
    /// Base payout plus the whole jackpot; jackpot reset to its seed.
    Jackpot,
}

/// Result of settling a winning round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Whole chips to credit to the player (includes `jackpot_awarded`).
    pub payout: u64,
    /// Sub-chip part of the base payout, in [CHIP_FRACTION] units, not
    /// included in `payout`.
    pub payout_fraction: u64,
    /// Jackpot meter after settlement.
    pub jackpot: u64,
    /// Portion of `payout` that came from the jackpot.
    pub jackpot_awarded: u64,
    pub outcome: Outcome,
}

/// `bet * multiplier * 10 * winners` in [CHIP_FRACTION] units.
pub fn base_payout_units(bet: u64, multiplier: f64, winner_count: usize) -> u64 {
    let units = bet
        .saturating_mul(PAYOUT_FACTOR)
        .saturating_mul(winner_count as u64);
    // Float-to-int casts saturate
    (units as f64 * multiplier * CHIP_FRACTION as f64).floor() as u64
}

/// Whole chips of `bet * multiplier * 10 * winners`.
pub fn base_payout(bet: u64, multiplier: f64, winner_count: usize) -> u64 {
    base_payout_units(bet, multiplier, winner_count) / CHIP_FRACTION
}

/// Settle a round that produced `winners` after `drawn_count` balls.
///
/// A bingo on or before ball [JACKPOT_THRESHOLD] adds the full jackpot to the
/// payout and resets the meter to [JACKPOT_SEED]. Later wins leave the meter
/// alone.
pub fn settle(
    winners: &[Winner],
    bet: u64,
    multiplier: f64,
    drawn_count: usize,
    jackpot: u64,
) -> Result<Settlement, BingoError> {
    if winners.is_empty() {
        return Err(BingoError::NoWinners);
    }
    let units = base_payout_units(bet, multiplier, winners.len());
    let base = units / CHIP_FRACTION;
    let payout_fraction = units % CHIP_FRACTION;

    if drawn_count <= JACKPOT_THRESHOLD as usize {
        Ok(Settlement {
            payout: base.saturating_add(jackpot),
            payout_fraction,
            jackpot: JACKPOT_SEED,
            jackpot_awarded: jackpot,
            outcome: Outcome::Jackpot,
        })
    } else {
        Ok(Settlement {
            payout: base,
            payout_fraction,
            jackpot,
            jackpot_awarded: 0,
            outcome: Outcome::Win,
        })
    }
}

/// Fold a carried sub-chip remainder into whole chips.
///
/// Returns the new whole-chip amount and the remainder left below one chip.
pub fn carry(chips: u64, fraction: u64) -> (u64, u64) {
    (
        chips.saturating_add(fraction / CHIP_FRACTION),
        fraction % CHIP_FRACTION,
    )
}

/// What a round's stake feeds into the jackpot (10% of `bet * cards`), in
/// [CHIP_FRACTION] units.
pub fn jackpot_contribution(bet: u64, card_count: u8) -> u64 {
    bet.saturating_mul(card_count as u64)
        .saturating_mul(CHIP_FRACTION)
        .saturating_mul(JACKPOT_CONTRIBUTION_BPS)
        / BPS_DENOMINATOR
}

/// Jackpot meter and its carried remainder after a round starts.
pub fn accumulate(jackpot: u64, fraction: u64, bet: u64, card_count: u8) -> (u64, u64) {
    carry(
        jackpot,
        fraction.saturating_add(jackpot_contribution(bet, card_count)),
    )
}
