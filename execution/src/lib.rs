pub mod bingo;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use bingo::{
    evaluate, generate_card, multiplier, settle, BingoError, DrawSequencer, EventSink, GameRng,
    Outcome, Seed, Session, SessionConfig, Settlement,
};
