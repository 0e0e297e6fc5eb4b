/// Rows and columns on a card
pub const GRID_SIZE: usize = 5;

/// Row of the FREE cell
pub const FREE_ROW: usize = 2;

/// Column of the FREE cell
pub const FREE_COL: usize = 2;

/// Numbers available to each column (B: 1-15, I: 16-30, ...)
pub const COLUMN_SPAN: u8 = 15;

/// Highest ball in the machine
pub const MAX_BALL: u8 = 75;

/// Numbered cells on a card (everything except FREE)
pub const NUMBERS_PER_CARD: usize = GRID_SIZE * GRID_SIZE - 1;

/// Number of fixed winning patterns (5 rows, 5 columns, 2 diagonals)
pub const PATTERN_COUNT: usize = 12;

/// Minimum cards a player may hold
pub const MIN_CARDS: u8 = 1;

/// Maximum cards a player may hold
pub const MAX_CARDS: u8 = 10;

/// Smallest accepted bet per card
pub const MIN_BET: u64 = 1;

/// Largest bet offered by the table
pub const MAX_BET: u64 = 100;

/// Bet selected when a session opens
pub const DEFAULT_BET: u64 = 10;

/// Chips credited to a new session
pub const STARTING_BALANCE: u64 = 1_000;

/// Jackpot meter value after a reset
pub const JACKPOT_SEED: u64 = 10_000;

/// A bingo on or before this ball also pays the jackpot
pub const JACKPOT_THRESHOLD: u8 = 30;

/// Base payout per winning card, as a multiple of the bet
pub const PAYOUT_FACTOR: u64 = 10;

/// Share of every stake fed into the jackpot (basis points, 10%)
pub const JACKPOT_CONTRIBUTION_BPS: u64 = 1_000;

/// Sub-chip units per chip. Fractions of a chip (jackpot contributions,
/// multiplied payouts) are carried in these until they add up to a whole chip.
pub const CHIP_FRACTION: u64 = 10_000;

/// Highest multiplier the table gauge can show
pub const MULTIPLIER_DISPLAY_CAP: f64 = 3.0;

/// Time between automatic draw requests
pub const DRAW_INTERVAL_MS: u64 = 4_000;

/// Ball machine spin before a number is revealed
pub const SPIN_DURATION_MS: u64 = 2_000;

/// Time a drawn ball stays on display before the next request is admitted
pub const REVEAL_DURATION_MS: u64 = 1_000;
