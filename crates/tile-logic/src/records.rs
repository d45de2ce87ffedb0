//! Records kept in the ledger's keyed store

use serde::{Deserialize, Serialize};
use crate::address::{Address, Key};
use crate::board::Board;
use crate::error::LedgerError;
use crate::leaderboard::{Leaderboard, WinnerEntry, MAX_WINNER_COUNT};

/// The two competing teams
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Meme,
    Chain,
}

/// Singleton registry written by `initialize`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub maintainer: Key,
    /// Id of the most recently started season (0 before the first)
    pub current_season_id: u32,
    /// Length applied to seasons started from now on, in seconds
    pub season_duration: i64,
    /// True between `start_season` and `end_season`
    pub season_active: bool,
    pub current_season_ends_at: i64,
    pub chain_team: Address,
    pub meme_team: Address,
    pub winner: Address,
}

impl ConfigRecord {
    pub fn team_ref(&self, team: Team) -> &Address {
        match team {
            Team::Meme => &self.meme_team,
            Team::Chain => &self.chain_team,
        }
    }
}

/// Aggregate record for one team
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: Team,
    pub base_url: String,
    pub num_players: u32,
    /// Sum of merge points scored by the team's moves
    pub total_score: u64,
    pub total_moves: u64,
}

impl TeamRecord {
    pub fn new(team: Team, base_url: String) -> Self {
        Self { team, base_url, num_players: 0, total_score: 0, total_moves: 0 }
    }

    /// Commutative: the final totals do not depend on move order
    pub fn record_move(&mut self, gained: u32) -> Result<(), LedgerError> {
        self.total_score = self.total_score
            .checked_add(gained as u64)
            .ok_or(LedgerError::Overflow)?;
        self.total_moves = self.total_moves
            .checked_add(1)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}

/// Where a season sits in its lifecycle at a given time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonPhase {
    /// Created, start time not reached
    Unstarted,
    /// Accepting registrations, moves and submissions
    Active,
    /// Duration elapsed, waiting for the maintainer to close it
    Closable,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season_id: u32,
    pub started_at: i64,
    pub ends_at: i64,
    pub ended: bool,
    pub total_games: u64,
    pub leaderboard: Leaderboard,
}

impl SeasonRecord {
    pub fn phase(&self, now: i64) -> SeasonPhase {
        if self.ended {
            SeasonPhase::Ended
        } else if now < self.started_at {
            SeasonPhase::Unstarted
        } else if now < self.ends_at {
            SeasonPhase::Active
        } else {
            SeasonPhase::Closable
        }
    }

    pub fn is_live(&self, now: i64) -> bool {
        self.phase(now) == SeasonPhase::Active
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user: Key,
    /// Write-once
    pub team: Option<Team>,
}

impl UserRecord {
    pub fn new(user: Key) -> Self {
        Self { user, team: None }
    }

    /// `None -> Some(team)` is the only legal transition
    pub fn choose(&mut self, team: Team) -> Result<(), LedgerError> {
        match self.team {
            None => {
                self.team = Some(team);
                Ok(())
            }
            Some(_) => Err(LedgerError::UserAlreadyOnTeam),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeasonRecord {
    pub user: Key,
    pub season_id: u32,
    pub registered: bool,
    pub games_played: u32,
    pub highest_score: u32,
}

/// Game bound to one ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub ticket: Key,
    pub season_id: u32,
    /// Wallet that registered the session (the ticket may move on)
    pub player: Key,
    pub board: Board,
    pub move_count: u32,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    /// Winner of the most recently closed season
    pub season_winner: Option<WinnerEntry>,
    /// Best run of each player who reached the winning tile
    pub hall_of_fame: Vec<WinnerEntry>,
    pub max_winner_count: u8,
}

impl Default for WinnerRecord {
    fn default() -> Self {
        Self {
            season_winner: None,
            hall_of_fame: Vec::new(),
            max_winner_count: MAX_WINNER_COUNT as u8,
        }
    }
}

/// Any record the keyed store can hold
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    Config(ConfigRecord),
    Team(TeamRecord),
    Season(SeasonRecord),
    User(UserRecord),
    UserSeason(UserSeasonRecord),
    Game(GameSession),
    Winner(WinnerRecord),
}

/// Typed view over [`Record`]
pub trait StoredRecord: Clone + Sized {
    fn peek(record: &Record) -> Option<&Self>;
    fn wrap(self) -> Record;
}

macro_rules! stored_record {
    ($ty:ty, $variant:ident) => {
        impl StoredRecord for $ty {
            fn peek(record: &Record) -> Option<&Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn wrap(self) -> Record {
                Record::$variant(self)
            }
        }
    };
}

stored_record!(ConfigRecord, Config);
stored_record!(TeamRecord, Team);
stored_record!(SeasonRecord, Season);
stored_record!(UserRecord, User);
stored_record!(UserSeasonRecord, UserSeason);
stored_record!(GameSession, Game);
stored_record!(WinnerRecord, Winner);

#[cfg(test)]
mod tests {
    use super::*;

    fn season(started_at: i64, ends_at: i64) -> SeasonRecord {
        SeasonRecord {
            season_id: 1,
            started_at,
            ends_at,
            ended: false,
            total_games: 0,
            leaderboard: Leaderboard::default(),
        }
    }

    #[test]
    fn test_season_phases() {
        let mut s = season(100, 200);
        assert_eq!(s.phase(99), SeasonPhase::Unstarted);
        assert_eq!(s.phase(100), SeasonPhase::Active);
        assert_eq!(s.phase(199), SeasonPhase::Active);
        assert_eq!(s.phase(200), SeasonPhase::Closable);

        s.ended = true;
        assert_eq!(s.phase(150), SeasonPhase::Ended);
        assert!(!s.is_live(150));
    }

    #[test]
    fn test_team_choice_is_write_once() {
        let mut user = UserRecord::new(Key::new([1; 32]));
        assert!(user.choose(Team::Meme).is_ok());
        assert_eq!(user.choose(Team::Chain), Err(LedgerError::UserAlreadyOnTeam));
        assert_eq!(user.choose(Team::Meme), Err(LedgerError::UserAlreadyOnTeam));
        assert_eq!(user.team, Some(Team::Meme));
    }

    #[test]
    fn test_team_totals_are_order_independent() {
        let gains = [4u32, 0, 16, 8, 32];

        let mut forward = TeamRecord::new(Team::Chain, String::new());
        for g in gains {
            forward.record_move(g).unwrap();
        }
        let mut backward = TeamRecord::new(Team::Chain, String::new());
        for g in gains.iter().rev() {
            backward.record_move(*g).unwrap();
        }

        assert_eq!(forward, backward);
        assert_eq!(forward.total_score, 60);
        assert_eq!(forward.total_moves, 5);
    }

    #[test]
    fn test_team_total_overflow() {
        let mut team = TeamRecord::new(Team::Meme, String::new());
        team.total_moves = u64::MAX;
        assert_eq!(team.record_move(2), Err(LedgerError::Overflow));
    }

    #[test]
    fn test_stored_record_peek_checks_variant() {
        let record = UserRecord::new(Key::new([2; 32])).wrap();
        assert!(UserRecord::peek(&record).is_some());
        assert!(GameSession::peek(&record).is_none());
    }
}
