use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::{Winner, MAX_CARDS};

/// Something that happened at the table.
///
/// The engine returns these from every state change; whoever drives the table
/// (a terminal UI, a simulator, a renderer) maps them onto sound, animation and
/// confetti.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A fresh set of cards replaced the previous one.
    CardsDealt { card_count: u8, multiplier: f64 },
    /// A round began; `stake` was debited and `jackpot` already includes this
    /// round's contribution.
    RoundStarted { round: u64, stake: u64, jackpot: u64 },
    BallDrawn { round: u64, ball: u8, draw_count: u8 },
    /// One or more cards completed a pattern after the jackpot threshold.
    Win {
        round: u64,
        winners: Vec<Winner>,
        payout: u64,
        draw_count: u8,
    },
    /// One or more cards completed a pattern within the jackpot threshold.
    /// `payout` includes `jackpot_awarded`.
    Jackpot {
        round: u64,
        winners: Vec<Winner>,
        payout: u64,
        jackpot_awarded: u64,
        draw_count: u8,
    },
    /// All balls drawn without a winner.
    RoundExhausted { round: u64, draw_count: u8 },
    /// The round was stopped before it finished. The stake is not refunded.
    RoundAborted { round: u64, draw_count: u8 },
}

impl Event {
    fn tag(&self) -> u8 {
        match self {
            Event::CardsDealt { .. } => 0,
            Event::RoundStarted { .. } => 1,
            Event::BallDrawn { .. } => 2,
            Event::Win { .. } => 3,
            Event::Jackpot { .. } => 4,
            Event::RoundExhausted { .. } => 5,
            Event::RoundAborted { .. } => 6,
        }
    }
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        self.tag().write(writer);
        match self {
            Event::CardsDealt {
                card_count,
                multiplier,
            } => {
                card_count.write(writer);
                multiplier.to_bits().write(writer);
            }
            Event::RoundStarted {
                round,
                stake,
                jackpot,
            } => {
                round.write(writer);
                stake.write(writer);
                jackpot.write(writer);
            }
            Event::BallDrawn {
                round,
                ball,
                draw_count,
            } => {
                round.write(writer);
                ball.write(writer);
                draw_count.write(writer);
            }
            Event::Win {
                round,
                winners,
                payout,
                draw_count,
            } => {
                round.write(writer);
                winners.write(writer);
                payout.write(writer);
                draw_count.write(writer);
            }
            Event::Jackpot {
                round,
                winners,
                payout,
                jackpot_awarded,
                draw_count,
            } => {
                round.write(writer);
                winners.write(writer);
                payout.write(writer);
                jackpot_awarded.write(writer);
                draw_count.write(writer);
            }
            Event::RoundExhausted { round, draw_count }
            | Event::RoundAborted { round, draw_count } => {
                round.write(writer);
                draw_count.write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let event = match u8::read(reader)? {
            0 => Event::CardsDealt {
                card_count: u8::read(reader)?,
                multiplier: f64::from_bits(u64::read(reader)?),
            },
            1 => Event::RoundStarted {
                round: u64::read(reader)?,
                stake: u64::read(reader)?,
                jackpot: u64::read(reader)?,
            },
            2 => Event::BallDrawn {
                round: u64::read(reader)?,
                ball: u8::read(reader)?,
                draw_count: u8::read(reader)?,
            },
            3 => Event::Win {
                round: u64::read(reader)?,
                winners: Vec::<Winner>::read_range(reader, 0..=MAX_CARDS as usize)?,
                payout: u64::read(reader)?,
                draw_count: u8::read(reader)?,
            },
            4 => Event::Jackpot {
                round: u64::read(reader)?,
                winners: Vec::<Winner>::read_range(reader, 0..=MAX_CARDS as usize)?,
                payout: u64::read(reader)?,
                jackpot_awarded: u64::read(reader)?,
                draw_count: u8::read(reader)?,
            },
            5 => Event::RoundExhausted {
                round: u64::read(reader)?,
                draw_count: u8::read(reader)?,
            },
            6 => Event::RoundAborted {
                round: u64::read(reader)?,
                draw_count: u8::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };
        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        self.tag().encode_size()
            + match self {
                Event::CardsDealt {
                    card_count,
                    multiplier,
                } => card_count.encode_size() + multiplier.to_bits().encode_size(),
                Event::RoundStarted {
                    round,
                    stake,
                    jackpot,
                } => round.encode_size() + stake.encode_size() + jackpot.encode_size(),
                Event::BallDrawn {
                    round,
                    ball,
                    draw_count,
                } => round.encode_size() + ball.encode_size() + draw_count.encode_size(),
                Event::Win {
                    round,
                    winners,
                    payout,
                    draw_count,
                } => {
                    round.encode_size()
                        + winners.encode_size()
                        + payout.encode_size()
                        + draw_count.encode_size()
                }
                Event::Jackpot {
                    round,
                    winners,
                    payout,
                    jackpot_awarded,
                    draw_count,
                } => {
                    round.encode_size()
                        + winners.encode_size()
                        + payout.encode_size()
                        + jackpot_awarded.encode_size()
                        + draw_count.encode_size()
                }
                Event::RoundExhausted { round, draw_count }
                | Event::RoundAborted { round, draw_count } => {
                    round.encode_size() + draw_count.encode_size()
                }
            }
    }
}
