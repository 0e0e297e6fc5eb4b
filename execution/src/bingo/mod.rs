//! Bingo game execution.
//!
//! Leaf-first:
//! - [card]: card generation
//! - [multiplier]: card-count multiplier
//! - [sequencer]: ball draws without replacement
//! - [evaluator]: winning-pattern detection
//! - [payout]: win and jackpot settlement
//! - [session]: the table state that ties them together

pub mod card;
#[cfg(test)]
mod integration_tests;
pub mod evaluator;
pub mod multiplier;
pub mod payout;
pub mod sequencer;
pub mod session;

pub use card::generate_card;
pub use evaluator::evaluate;
pub use multiplier::multiplier;
pub use payout::{settle, Outcome, Settlement};
pub use sequencer::DrawSequencer;
pub use session::{Session, SessionConfig};

use bingo_types::bingo::{CardError, DrawError, Event};
use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use thiserror::Error;

/// Table seed every game RNG is derived from.
pub type Seed = [u8; 32];

/// Deterministic random number generator.
///
/// Uses SHA256 hash chains so a table seed, session and round always produce
/// the same cards and the same ball order.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, session ID, and round number.
    pub fn new(seed: &Seed, session_id: u64, round: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(&session_id.to_be_bytes());
        hasher.update(&round.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }
}

/// Error during bingo execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BingoError {
    /// Every ball has already been drawn.
    #[error("draw pool is exhausted")]
    ExhaustedPool,
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u64, required: u64 },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no round is in progress")]
    NoActiveRound,
    /// A draw was completed without being requested first.
    #[error("no draw is in flight")]
    NoDrawInFlight,
    /// Settlement only exists for rounds with at least one winning card.
    #[error("no winning cards to settle")]
    NoWinners,
    /// Draw history rejected a ball (pool and history disagree).
    #[error(transparent)]
    Draw(#[from] DrawError),
    /// Card generation produced an invalid layout.
    #[error(transparent)]
    Card(#[from] CardError),
}

/// Receiver for table events (sound, animation, logging, ...).
pub trait EventSink {
    fn emit(&mut self, event: &Event);

    fn emit_all(&mut self, events: &[Event]) {
        for event in events {
            self.emit(event);
        }
    }
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: &Event) {
        self.push(event.clone());
    }
}
