use bingo_execution::{Seed, SessionConfig};
use bingo_types::bingo::{
    DEFAULT_BET, DRAW_INTERVAL_MS, JACKPOT_SEED, MAX_BET, MAX_CARDS, MIN_BET, MIN_CARDS,
    REVEAL_DURATION_MS, SPIN_DURATION_MS, STARTING_BALANCE,
};
use commonware_utils::from_hex_formatted;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use thiserror::Error;
use tracing::Level;

/// Configuration for a simulated [crate::Table], usually read from YAML.
///
/// Every field is optional in the file; missing fields take the table
/// defaults.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Hex table seed. A random one is drawn when absent.
    pub seed: Option<String>,
    pub starting_balance: u64,
    pub bet: u64,
    pub card_count: u8,
    pub rounds: u64,

    pub draw_interval_ms: u64,
    pub spin_ms: u64,
    pub reveal_ms: u64,

    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            starting_balance: STARTING_BALANCE,
            bet: DEFAULT_BET,
            card_count: MIN_CARDS,
            rounds: 10,
            draw_interval_ms: DRAW_INTERVAL_MS,
            spin_ms: SPIN_DURATION_MS,
            reveal_ms: REVEAL_DURATION_MS,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be hex: {value}")]
    InvalidHex { field: &'static str, value: String },
    #[error("seed must be 32 bytes (got {len})")]
    InvalidSeedLength { len: usize },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("draw_interval_ms ({interval}) must cover spin_ms + reveal_ms ({busy})")]
    OverlappingDraws { interval: u64, busy: u64 },
}

/// Delays between the steps of a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Time between draw requests.
    pub draw_interval: Duration,
    /// Ball machine spin before the ball comes out.
    pub spin: Duration,
    /// Time the ball stays on display.
    pub reveal: Duration,
}

impl Pacing {
    /// No delays at all.
    pub fn instant() -> Self {
        Self {
            draw_interval: Duration::ZERO,
            spin: Duration::ZERO,
            reveal: Duration::ZERO,
        }
    }

    pub fn is_instant(&self) -> bool {
        *self == Self::instant()
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            draw_interval: Duration::from_millis(DRAW_INTERVAL_MS),
            spin: Duration::from_millis(SPIN_DURATION_MS),
            reveal: Duration::from_millis(REVEAL_DURATION_MS),
        }
    }
}

pub struct ValidatedConfig {
    pub seed: Seed,
    pub session: SessionConfig,
    pub rounds: u64,
    pub pacing: Pacing,
    pub log_level: Level,
}

fn parse_seed(value: &str) -> Result<Seed, ConfigError> {
    let bytes = from_hex_formatted(value).ok_or(ConfigError::InvalidHex {
        field: "seed",
        value: value.to_string(),
    })?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidSeedLength { len })
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        check_range("bet", self.bet, MIN_BET, MAX_BET)?;
        check_range(
            "card_count",
            self.card_count as u64,
            MIN_CARDS as u64,
            MAX_CARDS as u64,
        )?;
        if self.rounds == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "rounds",
                value: self.rounds,
            });
        }
        let busy = self.spin_ms.saturating_add(self.reveal_ms);
        if self.draw_interval_ms < busy {
            return Err(ConfigError::OverlappingDraws {
                interval: self.draw_interval_ms,
                busy,
            });
        }

        let seed = match &self.seed {
            Some(value) => parse_seed(value)?,
            None => {
                let mut seed = Seed::default();
                rand::thread_rng().fill_bytes(&mut seed);
                seed
            }
        };

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            seed,
            session: SessionConfig {
                starting_balance: self.starting_balance,
                bet: self.bet,
                card_count: self.card_count,
                jackpot: JACKPOT_SEED,
            },
            rounds: self.rounds,
            pacing: Pacing {
                draw_interval: Duration::from_millis(self.draw_interval_ms),
                spin: Duration::from_millis(self.spin_ms),
                reveal: Duration::from_millis(self.reveal_ms),
            },
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "0x000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("card_count: 4\nrounds: 3\n").unwrap();
        let validated = config.validate().unwrap();
        assert_eq!(validated.session.card_count, 4);
        assert_eq!(validated.session.bet, DEFAULT_BET);
        assert_eq!(validated.session.starting_balance, STARTING_BALANCE);
        assert_eq!(validated.rounds, 3);
        assert_eq!(validated.pacing, Pacing::default());
        assert_eq!(validated.log_level, Level::INFO);
    }

    #[test]
    fn test_seed_parsing() {
        let config = Config {
            seed: Some(SEED.to_string()),
            ..Config::default()
        };
        let validated = config.validate().unwrap();
        let expected: Vec<u8> = (0..32).collect();
        assert_eq!(validated.seed.as_slice(), expected.as_slice());

        let config = Config {
            seed: Some("not hex".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHex { field: "seed", .. })
        ));

        let config = Config {
            seed: Some("0xdeadbeef".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSeedLength { len: 4 })
        ));
    }

    #[test]
    fn test_rejects_bad_table_settings() {
        let config = Config {
            card_count: 11,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "card_count",
                ..
            })
        ));

        let config = Config {
            bet: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "bet", .. })
        ));

        let config = Config {
            rounds: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNonZero {
                field: "rounds",
                ..
            })
        ));

        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel { .. })
        ));
    }

    #[test]
    fn test_draw_interval_must_cover_animation() {
        let config = Config {
            draw_interval_ms: 2_500,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingDraws {
                interval: 2_500,
                busy: 3_000
            })
        ));

        let config = Config {
            draw_interval_ms: 0,
            spin_ms: 0,
            reveal_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().unwrap().pacing.is_instant());
    }
}
