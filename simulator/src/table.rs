//! Paced play against a single [Session].

use crate::{Pacing, ValidatedConfig};
use bingo_execution::{BingoError, EventSink, GameRng, Seed, Session};
use bingo_types::bingo::Event;
use commonware_codec::Encode;
use commonware_utils::hex;
use serde::Serialize;
use std::{future::Future, pin::Pin, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Session ID used when deriving per-round randomness.
const SESSION_ID: u64 = 1;

/// Logs every table event.
#[derive(Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &Event) {
        match event {
            Event::CardsDealt {
                card_count,
                multiplier,
            } => info!(card_count, multiplier, "cards dealt"),
            Event::RoundStarted {
                round,
                stake,
                jackpot,
            } => info!(round, stake, jackpot, "round started"),
            Event::BallDrawn {
                round,
                ball,
                draw_count,
            } => info!(round, ball, draw_count, "ball"),
            Event::Win {
                round,
                winners,
                payout,
                draw_count,
            } => info!(round, winners = winners.len(), payout, draw_count, "bingo"),
            Event::Jackpot {
                round,
                winners,
                payout,
                jackpot_awarded,
                draw_count,
            } => info!(
                round,
                winners = winners.len(),
                payout,
                jackpot_awarded,
                draw_count,
                "jackpot"
            ),
            Event::RoundExhausted { round, draw_count } => {
                warn!(round, draw_count, "machine exhausted")
            }
            Event::RoundAborted { round, draw_count } => {
                warn!(round, draw_count, "round aborted")
            }
        }
    }
}

/// Totals for a simulated session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rounds_played: u64,
    pub wins: u64,
    pub jackpots: u64,
    pub balls_drawn: u64,
    pub total_staked: u64,
    pub total_paid: u64,
    pub balance: u64,
    pub jackpot: u64,
    /// Play stopped on a shutdown signal.
    pub interrupted: bool,
    /// Play stopped because the balance could not cover a round.
    pub out_of_chips: bool,
    /// Hex of the encoded final session snapshot.
    pub snapshot: String,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::RoundStarted { stake, .. } => {
                self.rounds_played += 1;
                self.total_staked = self.total_staked.saturating_add(*stake);
            }
            Event::BallDrawn { .. } => self.balls_drawn += 1,
            Event::Win { payout, .. } => {
                self.wins += 1;
                self.total_paid = self.total_paid.saturating_add(*payout);
            }
            Event::Jackpot { payout, .. } => {
                self.wins += 1;
                self.jackpots += 1;
                self.total_paid = self.total_paid.saturating_add(*payout);
            }
            _ => {}
        }
    }
}

type Shutdown<'a> = Pin<&'a mut (dyn Future<Output = ()> + Send)>;

/// A bingo table that plays rounds on a timer.
pub struct Table<S: EventSink> {
    session: Session,
    seed: Seed,
    rounds: u64,
    pacing: Pacing,
    sink: S,
    summary: Summary,
}

impl<S: EventSink> Table<S> {
    pub fn new(config: ValidatedConfig, sink: S) -> Result<Self, BingoError> {
        let mut rng = GameRng::new(&config.seed, SESSION_ID, 0);
        let session = Session::new(config.session, &mut rng)?;
        Ok(Self {
            session,
            seed: config.seed,
            rounds: config.rounds,
            pacing: config.pacing,
            sink,
            summary: Summary::default(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&mut self, events: &[Event]) {
        for event in events {
            self.summary.record(event);
        }
        self.sink.emit_all(events);
    }

    /// Play until the configured number of rounds is done, the balance runs
    /// out, or `shutdown` resolves. A round interrupted by `shutdown` is
    /// aborted.
    pub async fn run(
        &mut self,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<Summary, BingoError> {
        let shutdown = std::pin::pin!(shutdown);
        let mut shutdown: Shutdown<'_> = shutdown;

        while self.summary.rounds_played < self.rounds {
            match self.play_round(&mut shutdown).await {
                Ok(true) => {}
                Ok(false) => {
                    let events = self.session.abort_round();
                    self.emit(&events);
                    self.summary.interrupted = true;
                    break;
                }
                Err(BingoError::InsufficientBalance { balance, required }) => {
                    warn!(balance, required, "out of chips");
                    self.summary.out_of_chips = true;
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let snapshot = self.session.snapshot();
        self.summary.balance = snapshot.balance;
        self.summary.jackpot = snapshot.jackpot;
        self.summary.snapshot = hex(&snapshot.encode());
        Ok(self.summary.clone())
    }

    /// Play one round to completion. Returns `false` if shutdown arrived
    /// first.
    async fn play_round(&mut self, shutdown: &mut Shutdown<'_>) -> Result<bool, BingoError> {
        let events = self.session.start_round()?;
        self.emit(&events);
        let mut rng = GameRng::new(&self.seed, SESSION_ID, self.session.round());

        let mut interval = (!self.pacing.is_instant()).then(|| {
            let mut interval = time::interval(self.pacing.draw_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        while self.session.is_playing() {
            match interval.as_mut() {
                Some(interval) => {
                    tokio::select! {
                        _ = shutdown.as_mut() => return Ok(false),
                        _ = interval.tick() => {},
                    }
                }
                // Unpaced play still has to notice shutdown between draws
                None => {
                    tokio::select! {
                        biased;
                        _ = shutdown.as_mut() => return Ok(false),
                        _ = tokio::task::yield_now() => {},
                    }
                }
            }
            if !self.session.request_draw()? {
                debug!(round = self.session.round(), "draw request ignored");
                continue;
            }
            if !wait(self.pacing.spin, shutdown).await {
                return Ok(false);
            }
            let events = self.session.complete_draw(&mut rng)?;
            self.emit(&events);
            if !wait(self.pacing.reveal, shutdown).await {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Sleep for `duration` unless shutdown comes first. Returns `false` on
/// shutdown.
async fn wait(duration: Duration, shutdown: &mut Shutdown<'_>) -> bool {
    if duration.is_zero() {
        return true;
    }
    tokio::select! {
        _ = shutdown.as_mut() => false,
        _ = time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use bingo_execution::mocks::RecordingSink;
    use bingo_types::bingo::SessionSnapshot;
    use commonware_codec::DecodeExt;
    use commonware_utils::from_hex;
    use std::future::pending;
    use tokio::time::Instant;

    const SEED: &str = "0x5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed5eed";

    fn config(rounds: u64) -> Config {
        Config {
            seed: Some(SEED.to_string()),
            rounds,
            ..Config::default()
        }
    }

    fn fast(config: Config) -> ValidatedConfig {
        let mut validated = config.validate().unwrap();
        validated.pacing = Pacing::instant();
        validated
    }

    #[tokio::test]
    async fn test_fast_run_plays_every_round() {
        let mut table = Table::new(fast(config(5)), RecordingSink::default()).unwrap();
        let summary = table.run(pending()).await.unwrap();

        assert_eq!(summary.rounds_played, 5);
        assert_eq!(summary.wins, 5);
        assert!(!summary.interrupted);
        assert_eq!(
            summary.balance,
            1_000 - summary.total_staked + summary.total_paid
        );
        assert_eq!(summary.balls_drawn as usize, table.sink().balls().len());

        let bytes = from_hex(&summary.snapshot).unwrap();
        let snapshot = SessionSnapshot::decode(bytes.as_ref()).unwrap();
        assert_eq!(snapshot, table.session().snapshot());
        assert_eq!(snapshot.round, 5);
    }

    #[tokio::test]
    async fn test_same_seed_same_game() {
        let play = || async {
            let mut table = Table::new(fast(config(3)), RecordingSink::default()).unwrap();
            table.run(pending()).await.unwrap();
            table.sink().events.clone()
        };
        assert_eq!(play().await, play().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_draws_follow_the_clock() {
        let mut table = Table::new(config(1).validate().unwrap(), RecordingSink::default()).unwrap();
        let start = Instant::now();
        table.run(pending()).await.unwrap();
        let elapsed = start.elapsed();

        // Ball n is requested at (n - 1) * 4s and revealed for 1s after a 2s spin
        let draws = table.session().drawn().len() as u32;
        let expected = Duration::from_secs(4) * (draws - 1) + Duration::from_secs(3);
        assert!(elapsed >= expected, "{:?} < {:?}", elapsed, expected);
        assert!(elapsed < expected + Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_round() {
        let mut table = Table::new(config(1).validate().unwrap(), RecordingSink::default()).unwrap();
        // Lands during the second spin
        let summary = table
            .run(time::sleep(Duration::from_secs(5)))
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.rounds_played, 1);
        assert_eq!(summary.balls_drawn, 1);
        assert_eq!(summary.balance, 1_000 - 10);
        assert!(!table.session().is_playing());
        assert!(matches!(
            table.sink().events.last(),
            Some(Event::RoundAborted {
                round: 1,
                draw_count: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_stops_fast_play() {
        let mut table = Table::new(fast(config(3)), RecordingSink::default()).unwrap();
        let summary = table.run(std::future::ready(())).await.unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.rounds_played, 1);
        assert_eq!(summary.balls_drawn, 0);
        assert_eq!(summary.balance, 1_000 - 10);
        assert!(!table.session().is_playing());
        assert_eq!(
            table.sink().events.last(),
            Some(&Event::RoundAborted {
                round: 1,
                draw_count: 0
            })
        );
        assert!(!summary.snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_stops_when_out_of_chips() {
        let config = Config {
            starting_balance: 5,
            ..config(3)
        };
        let mut table = Table::new(fast(config), RecordingSink::default()).unwrap();
        let summary = table.run(pending()).await.unwrap();

        assert!(summary.out_of_chips);
        assert_eq!(summary.rounds_played, 0);
        assert_eq!(summary.balance, 5);
    }
}
