use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use std::ops::RangeInclusive;
use thiserror::Error as ThisError;

use super::{DrawnNumbers, COLUMN_SPAN, FREE_COL, FREE_ROW, GRID_SIZE, MAX_BALL};

/// Wire value of the FREE cell (no ball is ever numbered 0).
const FREE_MARKER: u8 = 0;

/// A single square on a bingo card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// The center square, always marked.
    Free,
    Number(u8),
}

impl Cell {
    pub fn number(&self) -> Option<u8> {
        match self {
            Cell::Free => None,
            Cell::Number(n) => Some(*n),
        }
    }

    /// A cell is marked once its number has been drawn. FREE is always marked.
    pub fn is_marked(&self, drawn: &DrawnNumbers) -> bool {
        match self {
            Cell::Free => true,
            Cell::Number(n) => drawn.contains(*n),
        }
    }
}

impl Write for Cell {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Cell::Free => FREE_MARKER.write(writer),
            Cell::Number(n) => n.write(writer),
        }
    }
}

impl Read for Cell {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            FREE_MARKER => Ok(Cell::Free),
            n if n <= MAX_BALL => Ok(Cell::Number(n)),
            _ => Err(Error::Invalid("Cell", "number out of range")),
        }
    }
}

impl FixedSize for Cell {
    const SIZE: usize = 1;
}

/// Reasons a grid is not a valid bingo card.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CardError {
    #[error("cell ({row}, {col}) must be FREE")]
    MissingFree { row: usize, col: usize },
    #[error("FREE is only allowed at the center, found at ({row}, {col})")]
    MisplacedFree { row: usize, col: usize },
    #[error("value {value} at ({row}, {col}) is outside column range {min}..={max}")]
    OutOfRange {
        row: usize,
        col: usize,
        value: u8,
        min: u8,
        max: u8,
    },
    #[error("value {value} appears more than once")]
    Duplicate { value: u8 },
    #[error("no unused value left in column {col}")]
    ColumnExhausted { col: usize },
}

/// Numbers allowed in a column: column `c` holds `c*15+1 ..= c*15+15`.
pub fn column_range(col: usize) -> RangeInclusive<u8> {
    let start = col as u8 * COLUMN_SPAN + 1;
    start..=start + COLUMN_SPAN - 1
}

/// A 5x5 bingo card, indexed `[row][col]`.
///
/// Cards can only be built through [BingoCard::from_rows], which checks that
/// the center is FREE, every other cell sits in its column range, and no value
/// repeats. Once built a card never changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BingoCard {
    rows: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl BingoCard {
    pub fn from_rows(rows: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Result<Self, CardError> {
        // Bit 0 is never used; balls are 1-75
        let mut seen: u128 = 0;
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let is_center = row == FREE_ROW && col == FREE_COL;
                match (*cell, is_center) {
                    (Cell::Free, true) => {}
                    (Cell::Free, false) => return Err(CardError::MisplacedFree { row, col }),
                    (Cell::Number(_), true) => return Err(CardError::MissingFree { row, col }),
                    (Cell::Number(value), false) => {
                        let range = column_range(col);
                        if !range.contains(&value) {
                            return Err(CardError::OutOfRange {
                                row,
                                col,
                                value,
                                min: *range.start(),
                                max: *range.end(),
                            });
                        }
                        if seen & (1u128 << value) != 0 {
                            return Err(CardError::Duplicate { value });
                        }
                        seen |= 1u128 << value;
                    }
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.rows
    }

    /// Numbered cells in row-major order (FREE skipped).
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().flatten().filter_map(Cell::number)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers().any(|n| n == number)
    }

    pub fn is_marked(&self, row: usize, col: usize, drawn: &DrawnNumbers) -> bool {
        self.rows[row][col].is_marked(drawn)
    }
}

impl Write for BingoCard {
    fn write(&self, writer: &mut impl BufMut) {
        for cell in self.rows.iter().flatten() {
            cell.write(writer);
        }
    }
}

impl Read for BingoCard {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let mut rows = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
        for row in rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Cell::read(reader)?;
            }
        }
        BingoCard::from_rows(rows).map_err(|_| Error::Invalid("BingoCard", "invalid layout"))
    }
}

impl FixedSize for BingoCard {
    const SIZE: usize = GRID_SIZE * GRID_SIZE * Cell::SIZE;
}
