//! Ranked, capacity-bounded score lists
//!
//! Used for the per-season leaderboard and the winner hall of fame. The
//! program stores its own borsh copies of these lists and ranks them through
//! [`insert_ranked`] and [`upsert_best`].

use serde::{Deserialize, Serialize};
use crate::address::Key;
use crate::Team;

/// Default number of games kept on a season leaderboard
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Default number of hall-of-fame entries kept in the winner record
pub const MAX_WINNER_COUNT: usize = 10;

/// Insert `item` keeping `entries` in descending score order.
///
/// Equal scores keep submission order (earlier ranks higher). When the list
/// exceeds `capacity` the last entry is dropped, which may be `item` itself.
/// Returns the rank `item` landed at, or `None` if it did not place.
pub fn insert_ranked<T>(
    entries: &mut Vec<T>,
    item: T,
    capacity: usize,
    score: impl Fn(&T) -> u32,
) -> Option<usize> {
    let incoming = score(&item);
    let pos = entries
        .iter()
        .position(|e| score(e) < incoming)
        .unwrap_or(entries.len());

    entries.insert(pos, item);
    entries.truncate(capacity);

    (pos < capacity).then_some(pos)
}

/// Keep at most one entry per key: replace the existing entry when `item`
/// ranks strictly better, otherwise append. Then re-sort best-first and
/// truncate to `capacity`.
pub fn upsert_best<T, K: PartialEq, R: Ord>(
    entries: &mut Vec<T>,
    item: T,
    capacity: usize,
    key: impl Fn(&T) -> K,
    rank: impl Fn(&T) -> R,
) -> bool {
    let changed = match entries.iter().position(|e| key(e) == key(&item)) {
        Some(i) if rank(&item) > rank(&entries[i]) => {
            entries[i] = item;
            true
        }
        Some(_) => false,
        None => {
            entries.push(item);
            true
        }
    };

    if changed {
        // stable sort keeps earlier entries first among equals
        entries.sort_by(|a, b| rank(b).cmp(&rank(a)));
        entries.truncate(capacity);
    }
    changed
}

/// One finished session on a season leaderboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Ticket id of the session
    pub game: Key,
    pub player: Key,
    pub team: Team,
    pub score: u32,
    pub top_tile: u16,
    pub moves: u32,
}

/// Season leaderboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub capacity: u8,
    pub entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::with_capacity(LEADERBOARD_CAPACITY as u8)
    }
}

impl Leaderboard {
    pub fn with_capacity(capacity: u8) -> Self {
        Self { capacity, entries: Vec::new() }
    }

    /// Insert a finished game; returns its rank if it placed
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        insert_ranked(&mut self.entries, entry, self.capacity as usize, |e| e.score)
    }

    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Lowest score still on a full board, `None` while there is room
    pub fn cutoff(&self) -> Option<u32> {
        if self.entries.len() < self.capacity as usize {
            return None;
        }
        self.entries.last().map(|e| e.score)
    }

    pub fn is_ordered(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].score >= w[1].score)
    }
}

/// A player who reached the winning tile, or a season winner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerEntry {
    pub user: Key,
    pub team: Team,
    pub season_id: u32,
    pub score: u32,
    pub top_tile: u16,
}

impl WinnerEntry {
    pub fn from_leaderboard(entry: &LeaderboardEntry, season_id: u32) -> Self {
        Self {
            user: entry.player,
            team: entry.team,
            season_id,
            score: entry.score,
            top_tile: entry.top_tile,
        }
    }

    /// Hall-of-fame ordering: score first, then top tile
    pub fn rank(&self) -> (u32, u16) {
        (self.score, self.top_tile)
    }
}
