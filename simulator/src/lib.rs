//! Plays simulated bingo sessions on a real clock.

mod config;
mod table;

pub use config::{Config, ConfigError, Pacing, ValidatedConfig};
pub use table::{Summary, Table, TracingSink};
