use crate::{GameRng, Seed};
use bingo_types::bingo::{BingoCard, Cell, DrawnNumbers, Event};
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Creates a table seed for testing
pub fn create_seed(seed: u64) -> Seed {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = [0u8; 32];
    rng.fill_bytes(&mut out);
    out
}

/// Creates a game RNG for session 0, round 0 of the given seed
pub fn create_rng(seed: u64) -> GameRng {
    GameRng::new(&create_seed(seed), 0, 0)
}

/// A hand-laid card with known numbers in every pattern
///
/// ```text
///  3 16 31 46 61
///  7 20 35 50 65
/// 11 24 -- 55 70
/// 15 28 40 58 73
///  1 30 45 60 75
/// ```
pub fn fixed_card() -> BingoCard {
    let row = |values: [u8; 5]| values.map(Cell::Number);
    let mut rows = [
        row([3, 16, 31, 46, 61]),
        row([7, 20, 35, 50, 65]),
        row([11, 24, 0, 55, 70]),
        row([15, 28, 40, 58, 73]),
        row([1, 30, 45, 60, 75]),
    ];
    rows[2][2] = Cell::Free;
    BingoCard::from_rows(rows).expect("fixed card layout is valid")
}

/// Builds a draw history from balls in call order
pub fn drawn_from(balls: &[u8]) -> DrawnNumbers {
    DrawnNumbers::try_from(balls).expect("test balls are unique and in range")
}

/// Event sink that keeps everything it is given
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn balls(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::BallDrawn { ball, .. } => Some(*ball),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| matches(event)).count()
    }
}

impl crate::EventSink for RecordingSink {
    fn emit(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
