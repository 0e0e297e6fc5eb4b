//! Table state for a single player.
//!
//! A [Session] owns the balance, the bet, the dealt cards, the jackpot meter
//! and the round in progress. Every state change goes through one of its
//! methods and returns the [Event]s it produced; nothing else mutates the
//! balance or the jackpot.
//!
//! Draw pacing is split in two steps. [Session::request_draw] admits at most
//! one draw at a time (extra requests are ignored while the ball machine is
//! spinning) and [Session::complete_draw] takes the ball out, checks the cards
//! and settles the round if someone won. Callers put their spin/reveal delays
//! between the two.

use super::card::generate_cards;
use super::evaluator::evaluate;
use super::multiplier::multiplier;
use super::payout::{accumulate, carry, settle, Outcome};
use super::{BingoError, DrawSequencer, GameRng};
use bingo_types::bingo::{
    BingoCard, DrawnNumbers, Event, SessionSnapshot, Winner, DEFAULT_BET, JACKPOT_SEED,
    MAX_CARDS, MIN_BET, MIN_CARDS, STARTING_BALANCE,
};
use tracing::{debug, info, warn};

/// Initial table settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub starting_balance: u64,
    pub bet: u64,
    pub card_count: u8,
    pub jackpot: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            bet: DEFAULT_BET,
            card_count: MIN_CARDS,
            jackpot: JACKPOT_SEED,
        }
    }
}

fn validate_card_count(card_count: u8) -> Result<(), BingoError> {
    if !(MIN_CARDS..=MAX_CARDS).contains(&card_count) {
        return Err(BingoError::InvalidConfiguration("card count must be between 1 and 10"));
    }
    Ok(())
}

fn validate_bet(bet: u64) -> Result<(), BingoError> {
    if bet < MIN_BET {
        return Err(BingoError::InvalidConfiguration("bet must be greater than zero"));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoundStatus {
    Idle,
    Playing { draw_in_flight: bool },
}

/// One player's bingo table.
#[derive(Clone, Debug)]
pub struct Session {
    balance: u64,
    /// Sub-chip winnings not yet credited, in `CHIP_FRACTION` units.
    balance_fraction: u64,
    bet: u64,
    card_count: u8,
    multiplier: f64,
    cards: Vec<BingoCard>,
    jackpot: u64,
    /// Sub-chip jackpot contributions, in `CHIP_FRACTION` units.
    jackpot_fraction: u64,
    round: u64,
    status: RoundStatus,
    sequencer: DrawSequencer,
    winners: Vec<Winner>,
    last_win: u64,
}

impl Session {
    /// Open a table and deal the first set of cards.
    pub fn new(config: SessionConfig, rng: &mut GameRng) -> Result<Self, BingoError> {
        validate_card_count(config.card_count)?;
        validate_bet(config.bet)?;

        Ok(Self {
            balance: config.starting_balance,
            balance_fraction: 0,
            bet: config.bet,
            card_count: config.card_count,
            multiplier: multiplier(config.card_count as u32),
            cards: generate_cards(rng, config.card_count as usize)?,
            jackpot: config.jackpot,
            jackpot_fraction: 0,
            round: 0,
            status: RoundStatus::Idle,
            sequencer: DrawSequencer::new(),
            winners: Vec::new(),
            last_win: 0,
        })
    }

    /// Change how many cards are played.
    ///
    /// Any round in progress is aborted first (the stake is not refunded) and
    /// a fresh set of cards is dealt. Asking for the current count is a no-op.
    pub fn set_card_count(
        &mut self,
        card_count: u8,
        rng: &mut GameRng,
    ) -> Result<Vec<Event>, BingoError> {
        validate_card_count(card_count)?;
        if card_count == self.card_count {
            return Ok(Vec::new());
        }

        let cards = generate_cards(rng, card_count as usize)?;
        let mut events = self.abort_round();
        self.card_count = card_count;
        self.multiplier = multiplier(card_count as u32);
        self.cards = cards;
        self.winners.clear();
        self.sequencer = DrawSequencer::new();
        debug!(card_count, multiplier = self.multiplier, "dealt new cards");

        events.push(Event::CardsDealt {
            card_count,
            multiplier: self.multiplier,
        });
        Ok(events)
    }

    /// Change the bet per card. Not allowed mid-round.
    pub fn set_bet(&mut self, bet: u64) -> Result<(), BingoError> {
        validate_bet(bet)?;
        if self.is_playing() {
            return Err(BingoError::RoundInProgress);
        }
        self.bet = bet;
        Ok(())
    }

    /// Total a round costs with the current bet and card count.
    pub fn stake(&self) -> u64 {
        self.bet.saturating_mul(self.card_count as u64)
    }

    /// Start a round: debit the stake, grow the jackpot, clear the board.
    pub fn start_round(&mut self) -> Result<Vec<Event>, BingoError> {
        if self.is_playing() {
            return Err(BingoError::RoundInProgress);
        }
        let stake = self.stake();
        if self.balance < stake {
            warn!(balance = self.balance, stake, "insufficient balance to start round");
            return Err(BingoError::InsufficientBalance {
                balance: self.balance,
                required: stake,
            });
        }

        self.balance -= stake;
        (self.jackpot, self.jackpot_fraction) =
            accumulate(self.jackpot, self.jackpot_fraction, self.bet, self.card_count);
        self.round += 1;
        self.sequencer = DrawSequencer::new();
        self.winners.clear();
        self.status = RoundStatus::Playing {
            draw_in_flight: false,
        };
        info!(
            round = self.round,
            stake,
            balance = self.balance,
            jackpot = self.jackpot,
            "round started"
        );

        Ok(vec![Event::RoundStarted {
            round: self.round,
            stake,
            jackpot: self.jackpot,
        }])
    }

    /// Ask for the next ball.
    ///
    /// Returns `Ok(false)` without changing anything while a previous draw is
    /// still in flight.
    pub fn request_draw(&mut self) -> Result<bool, BingoError> {
        match self.status {
            RoundStatus::Idle => Err(BingoError::NoActiveRound),
            RoundStatus::Playing {
                draw_in_flight: true,
            } => {
                debug!(round = self.round, "draw already in flight");
                Ok(false)
            }
            RoundStatus::Playing {
                draw_in_flight: false,
            } => {
                self.status = RoundStatus::Playing {
                    draw_in_flight: true,
                };
                Ok(true)
            }
        }
    }

    /// Take the requested ball out of the machine and check every card.
    ///
    /// On a win the round is settled and ends; when the machine runs dry
    /// without a winner the round ends with nothing paid.
    pub fn complete_draw(&mut self, rng: &mut GameRng) -> Result<Vec<Event>, BingoError> {
        match self.status {
            RoundStatus::Idle => return Err(BingoError::NoActiveRound),
            RoundStatus::Playing {
                draw_in_flight: false,
            } => return Err(BingoError::NoDrawInFlight),
            RoundStatus::Playing {
                draw_in_flight: true,
            } => {}
        }

        let ball = match self.sequencer.draw_next(rng) {
            Ok(ball) => ball,
            Err(err) => {
                // The round cannot continue without balls
                self.status = RoundStatus::Idle;
                return Err(err);
            }
        };
        let draw_count = self.sequencer.drawn().len() as u8;
        debug!(round = self.round, ball, draw_count, "ball drawn");

        let mut events = vec![Event::BallDrawn {
            round: self.round,
            ball,
            draw_count,
        }];

        let winners = evaluate(&self.cards, self.sequencer.drawn());
        if !winners.is_empty() {
            let settlement = settle(
                &winners,
                self.bet,
                self.multiplier,
                draw_count as usize,
                self.jackpot,
            )?;
            let mut fraction = self.balance_fraction + settlement.payout_fraction;
            if settlement.outcome == Outcome::Jackpot {
                // The whole pool is paid out, including its carried remainder
                fraction += self.jackpot_fraction;
                self.jackpot_fraction = 0;
            }
            let (payout, fraction) = carry(settlement.payout, fraction);
            self.balance = self.balance.saturating_add(payout);
            self.balance_fraction = fraction;
            self.jackpot = settlement.jackpot;
            self.last_win = payout;
            self.status = RoundStatus::Idle;
            info!(
                round = self.round,
                winners = winners.len(),
                payout,
                jackpot = settlement.jackpot_awarded,
                draw_count,
                "bingo"
            );

            events.push(match settlement.outcome {
                Outcome::Win => Event::Win {
                    round: self.round,
                    winners: winners.clone(),
                    payout,
                    draw_count,
                },
                Outcome::Jackpot => Event::Jackpot {
                    round: self.round,
                    winners: winners.clone(),
                    payout,
                    jackpot_awarded: settlement.jackpot_awarded,
                    draw_count,
                },
            });
            self.winners = winners;
        } else if self.sequencer.is_exhausted() {
            self.status = RoundStatus::Idle;
            info!(round = self.round, "machine exhausted without a winner");
            events.push(Event::RoundExhausted {
                round: self.round,
                draw_count,
            });
        } else {
            self.status = RoundStatus::Playing {
                draw_in_flight: false,
            };
        }

        Ok(events)
    }

    /// Stop the current round, dropping any draw in flight.
    ///
    /// Balance and jackpot are left as they are. Returns no events when no
    /// round is in progress.
    pub fn abort_round(&mut self) -> Vec<Event> {
        if !self.is_playing() {
            return Vec::new();
        }
        let draw_count = self.sequencer.drawn().len() as u8;
        self.status = RoundStatus::Idle;
        self.sequencer = DrawSequencer::new();
        info!(round = self.round, draw_count, "round aborted");
        vec![Event::RoundAborted {
            round: self.round,
            draw_count,
        }]
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Winnings below one chip not yet credited, in `CHIP_FRACTION` units.
    pub fn balance_fraction(&self) -> u64 {
        self.balance_fraction
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn card_count(&self) -> u8 {
        self.card_count
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn cards(&self) -> &[BingoCard] {
        &self.cards
    }

    /// Jackpot contributions below one chip, in `CHIP_FRACTION` units.
    pub fn jackpot_fraction(&self) -> u64 {
        self.jackpot_fraction
    }

    pub fn jackpot(&self) -> u64 {
        self.jackpot
    }

    /// Number of the current (or most recent) round; 0 before the first one.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn drawn(&self) -> &DrawnNumbers {
        self.sequencer.drawn()
    }

    /// Winners of the most recent settled round.
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Payout of the most recent win.
    pub fn last_win(&self) -> u64 {
        self.last_win
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.status, RoundStatus::Playing { .. })
    }

    pub fn draw_in_flight(&self) -> bool {
        matches!(
            self.status,
            RoundStatus::Playing {
                draw_in_flight: true
            }
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            balance: self.balance,
            // Fractions stay below CHIP_FRACTION
            balance_fraction: self.balance_fraction as u16,
            bet: self.bet,
            jackpot: self.jackpot,
            jackpot_fraction: self.jackpot_fraction as u16,
            round: self.round,
            is_playing: self.is_playing(),
            cards: self.cards.clone(),
            drawn: self.sequencer.drawn().clone(),
            winners: self.winners.clone(),
            last_win: self.last_win,
        }
    }
}
