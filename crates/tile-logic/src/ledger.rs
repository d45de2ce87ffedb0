//! Keyed-store model of the on-ledger program
//!
//! Every record lives at its derived [`Address`]. Each operation reads the
//! records it needs from the committed store, stages its writes, and commits
//! them only after every check passed, so a failed operation leaves the store
//! untouched. Ticket holders are re-read from the [`TicketBook`] on every
//! gated call.

use std::collections::BTreeMap;

use crate::address::{Address, Key};
use crate::board::{BoardRules, Classic2048, Direction, MoveOutcome, WINNING_TILE};
use crate::error::LedgerError;
use crate::leaderboard::{upsert_best, Leaderboard, LeaderboardEntry, WinnerEntry};
use crate::records::{
    ConfigRecord, GameSession, Record, SeasonRecord, StoredRecord, Team, TeamRecord, UserRecord,
    UserSeasonRecord, WinnerRecord,
};
use crate::{DEFAULT_SEASON_DURATION, MAX_URL_LEN};

type Result<T> = core::result::Result<T, LedgerError>;

/// One-of-one ticket tokens: mint -> current holder
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketBook {
    holders: BTreeMap<Key, Key>,
}

impl TicketBook {
    pub fn holder(&self, mint: &Key) -> Option<Key> {
        self.holders.get(mint).copied()
    }

    pub fn exists(&self, mint: &Key) -> bool {
        self.holders.contains_key(mint)
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}

/// Writes staged by one operation
#[derive(Default)]
struct Staged {
    records: Vec<(Address, Record)>,
    tickets: Vec<(Key, Key)>,
}

impl Staged {
    fn put<T: StoredRecord>(&mut self, address: Address, record: T) {
        self.records.push((address, record.wrap()));
    }

    fn assign_ticket(&mut self, mint: Key, holder: Key) {
        self.tickets.push((mint, holder));
    }
}

/// Result of a successful `make_move`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReceipt {
    pub outcome: MoveOutcome,
    pub move_count: u32,
    pub reached_winning_tile: bool,
}

/// In-memory ledger running the game program's operations
#[derive(Clone, Debug)]
pub struct Ledger<R: BoardRules = Classic2048> {
    records: BTreeMap<Address, Record>,
    tickets: TicketBook,
    now: i64,
    rules: R,
}

impl Default for Ledger<Classic2048> {
    fn default() -> Self {
        Self::new(Classic2048)
    }
}

impl<R: BoardRules> Ledger<R> {
    pub fn new(rules: R) -> Self {
        Self { records: BTreeMap::new(), tickets: TicketBook::default(), now: 0, rules }
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn warp_to(&mut self, unix_timestamp: i64) {
        self.now = unix_timestamp;
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fresh copy of the record at `address`, if any
    pub fn fetch<T: StoredRecord>(&self, address: &Address) -> Result<Option<T>> {
        match self.records.get(address) {
            None => Ok(None),
            Some(record) => T::peek(record)
                .cloned()
                .map(Some)
                .ok_or(LedgerError::AccountTypeMismatch),
        }
    }

    fn load<T: StoredRecord>(&self, address: &Address, missing: LedgerError) -> Result<T> {
        self.fetch(address)?.ok_or(missing)
    }

    pub fn config(&self) -> Result<ConfigRecord> {
        self.load(&Address::config(), LedgerError::NotInitialized)
    }

    pub fn team(&self, team: Team) -> Result<TeamRecord> {
        self.load(&Address::team(team), LedgerError::NotInitialized)
    }

    pub fn winner(&self) -> Result<WinnerRecord> {
        self.load(&Address::winner(), LedgerError::NotInitialized)
    }

    pub fn season(&self, season_id: u32) -> Result<Option<SeasonRecord>> {
        self.fetch(&Address::season(season_id))
    }

    pub fn user(&self, user: &Key) -> Result<Option<UserRecord>> {
        self.fetch(&Address::user(user))
    }

    pub fn user_season(&self, user: &Key, season_id: u32) -> Result<Option<UserSeasonRecord>> {
        self.fetch(&Address::user_season(user, season_id))
    }

    pub fn game(&self, ticket: &Key) -> Result<Option<GameSession>> {
        self.fetch(&Address::game(ticket))
    }

    pub fn ticket_holder(&self, mint: &Key) -> Option<Key> {
        self.tickets.holder(mint)
    }

    pub fn tickets(&self) -> &TicketBook {
        &self.tickets
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // ── Transaction plumbing ─────────────────────────────────────────

    fn execute<T>(&mut self, op: impl FnOnce(&Self, &mut Staged) -> Result<T>) -> Result<T> {
        let mut staged = Staged::default();
        let out = op(self, &mut staged)?;

        for (address, record) in staged.records {
            self.records.insert(address, record);
        }
        for (mint, holder) in staged.tickets {
            self.tickets.holders.insert(mint, holder);
        }
        Ok(out)
    }

    fn require_maintainer(config: &ConfigRecord, signer: &Key) -> Result<()> {
        if config.maintainer != *signer {
            return Err(LedgerError::UnauthorizedMaintainer);
        }
        Ok(())
    }

    /// Re-read the live ticket holder; the caller must hold it now
    fn require_ticket_holder(&self, user: &Key, ticket: &Key) -> Result<()> {
        match self.tickets.holder(ticket) {
            Some(holder) if holder == *user => Ok(()),
            _ => Err(LedgerError::TokenOwnershipViolation),
        }
    }

    /// The open season, provided `season_id` is it and it is inside its live window
    fn live_season(&self, config: &ConfigRecord, season_id: u32) -> Result<SeasonRecord> {
        if !config.season_active || config.current_season_id != season_id {
            return Err(LedgerError::SeasonNotActive);
        }
        let season: SeasonRecord =
            self.load(&Address::season(season_id), LedgerError::SeasonNotActive)?;
        if !season.is_live(self.now) {
            return Err(LedgerError::SeasonNotActive);
        }
        Ok(season)
    }

    fn chosen_team(&self, user: &Key) -> Result<Team> {
        self.user(user)?
            .and_then(|u| u.team)
            .ok_or(LedgerError::TeamNotChosen)
    }

    // ── Maintainer operations ────────────────────────────────────────

    /// Create the config registry, both team records and the winner record
    pub fn initialize(
        &mut self,
        maintainer: &Key,
        chain_team_url: &str,
        meme_team_url: &str,
    ) -> Result<()> {
        self.execute(|ledger, tx| {
            if ledger.records.contains_key(&Address::config()) {
                return Err(LedgerError::AlreadyInitialized);
            }
            if chain_team_url.len() > MAX_URL_LEN || meme_team_url.len() > MAX_URL_LEN {
                return Err(LedgerError::UrlTooLong);
            }

            let config = ConfigRecord {
                maintainer: *maintainer,
                current_season_id: 0,
                season_duration: DEFAULT_SEASON_DURATION,
                season_active: false,
                current_season_ends_at: ledger.now,
                chain_team: Address::team(Team::Chain),
                meme_team: Address::team(Team::Meme),
                winner: Address::winner(),
            };

            let chain_team = TeamRecord::new(Team::Chain, chain_team_url.to_string());
            let meme_team = TeamRecord::new(Team::Meme, meme_team_url.to_string());
            tx.put(Address::team(Team::Chain), chain_team);
            tx.put(Address::team(Team::Meme), meme_team);
            tx.put(Address::winner(), WinnerRecord::default());
            tx.put(Address::config(), config);
            Ok(())
        })
    }

    /// Change the length of seasons started from now on
    pub fn update_season_duration(&mut self, signer: &Key, new_duration: i64) -> Result<()> {
        self.execute(|ledger, tx| {
            let mut config = ledger.config()?;
            Self::require_maintainer(&config, signer)?;
            if new_duration <= 0 {
                return Err(LedgerError::InvalidDuration);
            }

            config.season_duration = new_duration;
            tx.put(Address::config(), config);
            Ok(())
        })
    }

    /// Open season `current_season_id + 1`; returns its id
    pub fn start_season(&mut self, signer: &Key, start_time: i64) -> Result<u32> {
        self.execute(|ledger, tx| {
            let mut config = ledger.config()?;
            Self::require_maintainer(&config, signer)?;

            if config.season_active {
                return Err(LedgerError::SeasonNotEnded);
            }
            if let Some(previous) = ledger.season(config.current_season_id)? {
                if !previous.ended {
                    return Err(LedgerError::SeasonNotEnded);
                }
            }
            // seasons never overlap
            if start_time < config.current_season_ends_at {
                return Err(LedgerError::SeasonNotEnded);
            }

            let season_id = config.current_season_id
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;
            if ledger.records.contains_key(&Address::season(season_id)) {
                return Err(LedgerError::SeasonNotEnded);
            }
            let ends_at = start_time
                .checked_add(config.season_duration)
                .ok_or(LedgerError::Overflow)?;

            let season = SeasonRecord {
                season_id,
                started_at: start_time,
                ends_at,
                ended: false,
                total_games: 0,
                leaderboard: Leaderboard::default(),
            };

            config.current_season_id = season_id;
            config.season_active = true;
            config.current_season_ends_at = ends_at;

            tx.put(Address::season(season_id), season);
            tx.put(Address::config(), config);
            Ok(season_id)
        })
    }

    /// Close the current season once its end time has passed and record
    /// its top leaderboard entry as the season winner
    pub fn end_season(&mut self, signer: &Key) -> Result<Option<WinnerEntry>> {
        self.execute(|ledger, tx| {
            let mut config = ledger.config()?;
            Self::require_maintainer(&config, signer)?;
            if !config.season_active {
                return Err(LedgerError::NoActiveSeason);
            }

            let season_id = config.current_season_id;
            let mut season: SeasonRecord =
                ledger.load(&Address::season(season_id), LedgerError::NoActiveSeason)?;
            if ledger.now < season.ends_at {
                return Err(LedgerError::SeasonStillRunning);
            }
            let mut winner = ledger.winner()?;

            let season_winner = season.leaderboard
                .top()
                .map(|top| WinnerEntry::from_leaderboard(top, season_id));

            season.ended = true;
            config.season_active = false;
            winner.season_winner = season_winner;

            tx.put(Address::season(season_id), season);
            tx.put(Address::config(), config);
            tx.put(Address::winner(), winner);
            Ok(season_winner)
        })
    }

    // ── User operations ──────────────────────────────────────────────

    /// Assign the caller's team; allowed exactly once per user
    pub fn choose_team(&mut self, user: &Key, team: Team) -> Result<()> {
        self.execute(|ledger, tx| {
            let mut team_record = ledger.team(team)?;
            let mut user_record = ledger.user(user)?.unwrap_or_else(|| UserRecord::new(*user));

            user_record.choose(team)?;
            team_record.num_players = team_record.num_players
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;

            tx.put(Address::user(user), user_record);
            tx.put(Address::team(team), team_record);
            Ok(())
        })
    }

    /// Mint `ticket` to the caller and open a session on it for the current season
    pub fn register_game(&mut self, user: &Key, ticket: &Key) -> Result<()> {
        self.execute(|ledger, tx| {
            let config = ledger.config()?;
            ledger.chosen_team(user)?;
            let mut season = ledger.live_season(&config, config.current_season_id)?;
            let season_id = season.season_id;

            let user_season_address = Address::user_season(user, season_id);
            let mut user_season = ledger
                .fetch::<UserSeasonRecord>(&user_season_address)?
                .unwrap_or(UserSeasonRecord {
                    user: *user,
                    season_id,
                    registered: false,
                    games_played: 0,
                    highest_score: 0,
                });
            if user_season.registered {
                return Err(LedgerError::SessionAlreadyRegistered);
            }

            let game_address = Address::game(ticket);
            if ledger.tickets.exists(ticket) || ledger.records.contains_key(&game_address) {
                return Err(LedgerError::TicketAlreadyMinted);
            }

            let game = GameSession {
                ticket: *ticket,
                season_id,
                player: *user,
                board: ledger.rules.start(ticket.as_bytes()),
                move_count: 0,
                finished: false,
            };

            user_season.registered = true;
            user_season.games_played = user_season.games_played
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;
            season.total_games = season.total_games
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;

            tx.assign_ticket(*ticket, *user);
            tx.put(game_address, game);
            tx.put(user_season_address, user_season);
            tx.put(Address::season(season_id), season);
            Ok(())
        })
    }

    /// Apply one move to the session bound to `ticket`; the caller must hold the ticket
    pub fn make_move(
        &mut self,
        user: &Key,
        ticket: &Key,
        direction: Direction,
    ) -> Result<MoveReceipt> {
        self.execute(|ledger, tx| {
            let config = ledger.config()?;
            let game_address = Address::game(ticket);
            let mut game: GameSession = ledger.load(&game_address, LedgerError::SessionNotFound)?;

            ledger.require_ticket_holder(user, ticket)?;
            if game.finished {
                return Err(LedgerError::SessionAlreadyFinished);
            }
            ledger.live_season(&config, game.season_id)?;

            let team = ledger.chosen_team(user)?;
            let team_address = config.team_ref(team).clone();
            let mut team_record: TeamRecord =
                ledger.load(&team_address, LedgerError::NotInitialized)?;
            if team_record.team != team {
                return Err(LedgerError::TeamMismatch);
            }

            if ledger.rules.is_terminal(&game.board) {
                return Err(LedgerError::GameOver);
            }
            let outcome =
                ledger.rules.apply(&game.board, direction, ticket.as_bytes(), game.move_count);
            if !outcome.changed {
                return Err(LedgerError::BoardUnchanged);
            }

            game.board = outcome.board;
            game.move_count = game.move_count
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;
            team_record.record_move(outcome.gained)?;

            let user_season_address = Address::user_season(&game.player, game.season_id);
            let mut user_season: UserSeasonRecord =
                ledger.load(&user_season_address, LedgerError::SessionNotFound)?;
            user_season.highest_score = user_season.highest_score.max(game.board.score);

            let reached_winning_tile = game.board.top_tile >= WINNING_TILE;
            if reached_winning_tile {
                let mut winner = ledger.winner()?;
                let entry = WinnerEntry {
                    user: *user,
                    team,
                    season_id: game.season_id,
                    score: game.board.score,
                    top_tile: game.board.top_tile,
                };
                let capacity = winner.max_winner_count as usize;
                if upsert_best(
                    &mut winner.hall_of_fame,
                    entry,
                    capacity,
                    |e| e.user,
                    |e| e.rank(),
                ) {
                    tx.put(Address::winner(), winner);
                }
            }

            let receipt = MoveReceipt {
                outcome,
                move_count: game.move_count,
                reached_winning_tile,
            };
            tx.put(game_address, game);
            tx.put(team_address, team_record);
            tx.put(user_season_address, user_season);
            Ok(receipt)
        })
    }

    /// Close the session into its season's leaderboard; returns the rank if it placed
    pub fn submit_leaderboard(&mut self, user: &Key, ticket: &Key) -> Result<Option<usize>> {
        self.execute(|ledger, tx| {
            let config = ledger.config()?;
            let game_address = Address::game(ticket);
            let mut game: GameSession = ledger.load(&game_address, LedgerError::SessionNotFound)?;

            ledger.require_ticket_holder(user, ticket)?;
            if game.finished {
                return Err(LedgerError::SessionAlreadyFinished);
            }
            let mut season = ledger.live_season(&config, game.season_id)?;
            let team = ledger.chosen_team(user)?;

            let rank = season.leaderboard.submit(LeaderboardEntry {
                game: *ticket,
                player: *user,
                team,
                score: game.board.score,
                top_tile: game.board.top_tile,
                moves: game.move_count,
            });
            game.finished = true;

            let user_season_address = Address::user_season(&game.player, game.season_id);
            let mut user_season: UserSeasonRecord =
                ledger.load(&user_season_address, LedgerError::SessionNotFound)?;
            user_season.highest_score = user_season.highest_score.max(game.board.score);

            tx.put(Address::season(game.season_id), season);
            tx.put(game_address, game);
            tx.put(user_season_address, user_season);
            Ok(rank)
        })
    }

    // ── External token subsystem ─────────────────────────────────────

    /// Hand a ticket to another wallet, as the token program would
    pub fn transfer_ticket(&mut self, from: &Key, ticket: &Key, to: &Key) -> Result<()> {
        self.execute(|ledger, tx| {
            ledger.require_ticket_holder(from, ticket)?;
            tx.assign_ticket(*ticket, *to);
            Ok(())
        })
    }
}
