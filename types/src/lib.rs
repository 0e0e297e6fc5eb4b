//! Shared data model for the bingo engine.
//!
//! Everything in here is plain data plus its binary encoding. Game rules
//! (card generation, draws, win evaluation, settlement) live in
//! `bingo-execution`.

pub mod bingo;
