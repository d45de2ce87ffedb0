//! Tile Logic for Tile Clash
//!
//! Core game logic for the seasonal team 2048 game.
//! This crate is compiled to:
//! - Native (for the program and the `Ledger` test model)
//! - WASM (for frontend board replay)

mod random;
mod board;
mod address;
mod leaderboard;
mod records;
mod error;
mod ledger;

#[cfg(feature = "wasm")]
mod wasm;

pub use random::SeededRng;
pub use board::{
    Board, BoardRules, Classic2048, Direction, Grid, MoveOutcome, BOARD_SIZE, START_TOP_TILE,
    WINNING_TILE,
};
pub use address::{seeds, season_seed, team_seed, Address, Key};
pub use leaderboard::{
    insert_ranked, upsert_best, Leaderboard, LeaderboardEntry, WinnerEntry, LEADERBOARD_CAPACITY,
    MAX_WINNER_COUNT,
};
pub use records::{
    ConfigRecord, GameSession, Record, SeasonPhase, SeasonRecord, StoredRecord, Team, TeamRecord,
    UserRecord, UserSeasonRecord, WinnerRecord,
};
pub use error::LedgerError;
pub use ledger::{Ledger, MoveReceipt, TicketBook};

/// Maximum byte length of a team's base URL
pub const MAX_URL_LEN: usize = 100;

/// Season length used until the maintainer changes it: one week
pub const DEFAULT_SEASON_DURATION: i64 = 7 * 24 * 60 * 60;

/// Replay `directions` from the opening board of `seed`, skipping moves that
/// change nothing. Stops at the first terminal board.
pub fn replay<R: BoardRules>(
    rules: &R,
    seed: &[u8; 32],
    directions: &[Direction],
) -> (Board, u32) {
    let mut board = rules.start(seed);
    let mut move_count = 0u32;

    for &dir in directions {
        if rules.is_terminal(&board) {
            break;
        }
        let outcome = rules.apply(&board, dir, seed, move_count);
        if outcome.changed {
            board = outcome.board;
            move_count += 1;
        }
    }
    (board, move_count)
}
