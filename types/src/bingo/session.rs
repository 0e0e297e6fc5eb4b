use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::{BingoCard, DrawnNumbers, Winner, CHIP_FRACTION, MAX_CARDS};

/// Point-in-time copy of a table, used for diagnostics and summaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub balance: u64,
    /// Uncredited winnings below one chip, in [CHIP_FRACTION] units.
    pub balance_fraction: u16,
    pub bet: u64,
    pub jackpot: u64,
    /// Jackpot contributions below one chip, in [CHIP_FRACTION] units.
    pub jackpot_fraction: u16,
    pub round: u64,
    pub is_playing: bool,
    pub cards: Vec<BingoCard>,
    pub drawn: DrawnNumbers,
    pub winners: Vec<Winner>,
    pub last_win: u64,
}

impl Write for SessionSnapshot {
    fn write(&self, writer: &mut impl BufMut) {
        self.balance.write(writer);
        self.balance_fraction.write(writer);
        self.bet.write(writer);
        self.jackpot.write(writer);
        self.jackpot_fraction.write(writer);
        self.round.write(writer);
        self.is_playing.write(writer);
        self.cards.write(writer);
        self.drawn.write(writer);
        self.winners.write(writer);
        self.last_win.write(writer);
    }
}

impl Read for SessionSnapshot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let snapshot = Self {
            balance: u64::read(reader)?,
            balance_fraction: u16::read(reader)?,
            bet: u64::read(reader)?,
            jackpot: u64::read(reader)?,
            jackpot_fraction: u16::read(reader)?,
            round: u64::read(reader)?,
            is_playing: bool::read(reader)?,
            cards: Vec::<BingoCard>::read_range(reader, 1..=MAX_CARDS as usize)?,
            drawn: DrawnNumbers::read(reader)?,
            winners: Vec::<Winner>::read_range(reader, 0..=MAX_CARDS as usize)?,
            last_win: u64::read(reader)?,
        };
        if [snapshot.balance_fraction, snapshot.jackpot_fraction]
            .iter()
            .any(|fraction| *fraction as u64 >= CHIP_FRACTION)
        {
            return Err(Error::Invalid("SessionSnapshot", "fraction of a chip out of range"));
        }
        if snapshot
            .winners
            .iter()
            .any(|w| w.card_index >= snapshot.cards.len())
        {
            return Err(Error::Invalid("SessionSnapshot", "winner references missing card"));
        }
        Ok(snapshot)
    }
}

impl EncodeSize for SessionSnapshot {
    fn encode_size(&self) -> usize {
        self.balance.encode_size()
            + self.balance_fraction.encode_size()
            + self.bet.encode_size()
            + self.jackpot.encode_size()
            + self.jackpot_fraction.encode_size()
            + self.round.encode_size()
            + self.is_playing.encode_size()
            + self.cards.encode_size()
            + self.drawn.encode_size()
            + self.winners.encode_size()
            + self.last_win.encode_size()
    }
}
