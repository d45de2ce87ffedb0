//! Account state definitions

use anchor_lang::prelude::*;
use tile_logic::{
    Board, Direction, Team, TeamRecord, BOARD_SIZE, LEADERBOARD_CAPACITY, MAX_URL_LEN,
    MAX_WINNER_COUNT,
};

use crate::error::GameError;

pub const CONFIG_SEED: &[u8] = tile_logic::seeds::CONFIG;
pub const WINNER_SEED: &[u8] = tile_logic::seeds::WINNER;
pub const SEASON_SEED: &[u8] = tile_logic::seeds::SEASON;
pub const MEME_TEAM_SEED: &[u8] = tile_logic::seeds::MEME_TEAM;
pub const CHAIN_TEAM_SEED: &[u8] = tile_logic::seeds::CHAIN_TEAM;
pub const USER_SEED: &[u8] = tile_logic::seeds::USER;
pub const USER_SEASON_SEED: &[u8] = tile_logic::seeds::USER_SEASON;
pub const GAME_SEED: &[u8] = tile_logic::seeds::GAME;

/// Default season length in seconds (7 days in production, 5s in testing)
#[cfg(not(feature = "testing"))]
pub const DEFAULT_SEASON_DURATION: i64 = tile_logic::DEFAULT_SEASON_DURATION;
#[cfg(feature = "testing")]
pub const DEFAULT_SEASON_DURATION: i64 = 5;

/// Team selector as stored on chain
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TeamType {
    MemeTeam,
    ChainTeam,
}

impl From<TeamType> for Team {
    fn from(team: TeamType) -> Self {
        match team {
            TeamType::MemeTeam => Team::Meme,
            TeamType::ChainTeam => Team::Chain,
        }
    }
}

impl From<Team> for TeamType {
    fn from(team: Team) -> Self {
        match team {
            Team::Meme => TeamType::MemeTeam,
            Team::Chain => TeamType::ChainTeam,
        }
    }
}

/// Slide direction passed to `make_move`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl From<MoveDirection> for Direction {
    fn from(dir: MoveDirection) -> Self {
        match dir {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
            MoveDirection::Left => Direction::Left,
            MoveDirection::Right => Direction::Right,
        }
    }
}

/// Global configuration account
#[account]
#[derive(Default)]
pub struct ConfigAccount {
    /// Only key allowed to run season lifecycle instructions
    pub maintainer: Pubkey,
    /// Most recently started season (0 before the first)
    pub current_season_id: u32,
    /// Length of seasons started from now on, in seconds
    pub season_duration: i64,
    /// True between `start_season` and `end_season`
    pub season_active: bool,
    pub current_season_started_at: i64,
    pub current_season_ends_at: i64,
    pub chain_team: Pubkey,
    pub meme_team: Pubkey,
    pub winner: Pubkey,
    /// PDA bump seed
    pub bump: u8,
}

impl ConfigAccount {
    pub const LEN: usize = 8 + // discriminator
        32 +  // maintainer
        4 +   // current_season_id
        8 +   // season_duration
        1 +   // season_active
        8 +   // current_season_started_at
        8 +   // current_season_ends_at
        32 +  // chain_team
        32 +  // meme_team
        32 +  // winner
        1 +   // bump
        32;   // padding

    pub fn is_initialized(&self) -> bool {
        self.maintainer != Pubkey::default()
    }

    /// Seed for the season `start_season` creates
    pub fn next_season_id(&self) -> u32 {
        self.current_season_id.saturating_add(1)
    }

    pub fn team_ref(&self, team: TeamType) -> Pubkey {
        match team {
            TeamType::MemeTeam => self.meme_team,
            TeamType::ChainTeam => self.chain_team,
        }
    }

    /// The previous season is closed and the new one starts after it ended
    pub fn require_can_start(&self, start_time: i64) -> Result<()> {
        require!(
            !self.season_active && start_time >= self.current_season_ends_at,
            GameError::SeasonNotEnded
        );
        Ok(())
    }

    /// The season `end_season` closes, if one is open and was passed in
    pub fn open_season<'a>(
        &self,
        season: Option<&'a mut SeasonAccount>,
    ) -> Result<&'a mut SeasonAccount> {
        require!(self.season_active, GameError::NoActiveSeason);
        season
            .filter(|s| s.season_id == self.current_season_id && !s.ended)
            .ok_or_else(|| error!(GameError::NoActiveSeason))
    }

    /// `season_id` must be the open season and `now` inside its window
    pub fn require_live(&self, season_id: u32, now: i64) -> Result<()> {
        require!(
            self.season_active
                && self.current_season_id == season_id
                && self.current_season_started_at <= now
                && now < self.current_season_ends_at,
            GameError::SeasonNotActive
        );
        Ok(())
    }
}

/// One of the two global team accounts
#[account]
pub struct TeamAccount {
    pub team: TeamType,
    pub base_url: String,
    pub num_players: u32,
    /// Merge points scored by the team's moves
    pub total_score: u64,
    pub total_moves: u64,
    pub bump: u8,
}

impl TeamAccount {
    pub const LEN: usize = 8 + // discriminator
        1 +   // team
        4 + MAX_URL_LEN + // base_url
        4 +   // num_players
        8 +   // total_score
        8 +   // total_moves
        1 +   // bump
        16;   // padding

    pub fn to_record(&self) -> TeamRecord {
        TeamRecord {
            team: self.team.into(),
            base_url: self.base_url.clone(),
            num_players: self.num_players,
            total_score: self.total_score,
            total_moves: self.total_moves,
        }
    }

    pub fn store_record(&mut self, record: &TeamRecord) {
        self.num_players = record.num_players;
        self.total_score = record.total_score;
        self.total_moves = record.total_moves;
    }

    pub fn record_move(&mut self, gained: u32) -> Result<()> {
        let mut record = self.to_record();
        record.record_move(gained).map_err(|_| GameError::Overflow)?;
        self.store_record(&record);
        Ok(())
    }
}

/// Finished game on a season leaderboard
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TopGame {
    /// Ticket mint of the session
    pub game: Pubkey,
    pub player: Pubkey,
    pub team: TeamType,
    pub score: u32,
    pub top_tile: u16,
    pub moves: u32,
}

impl TopGame {
    pub const LEN: usize = 32 + 32 + 1 + 4 + 2 + 4;
}

/// Season account, one per season id
#[account]
pub struct SeasonAccount {
    pub season_id: u32,
    pub started_at: i64,
    pub ends_at: i64,
    pub ended: bool,
    pub total_games: u64,
    /// Descending by score, ties keep submission order
    pub leaderboard: Vec<TopGame>,
    pub bump: u8,
}

impl SeasonAccount {
    pub const LEN: usize = 8 + // discriminator
        4 +   // season_id
        8 +   // started_at
        8 +   // ends_at
        1 +   // ended
        8 +   // total_games
        4 + LEADERBOARD_CAPACITY * TopGame::LEN + // leaderboard
        1 +   // bump
        16;   // padding

    /// Mark the season ended once `now` reaches its end; the top entry wins
    pub fn close(&mut self, now: i64) -> Result<Option<WinnerInfo>> {
        require!(!self.ended, GameError::NoActiveSeason);
        require!(now >= self.ends_at, GameError::SeasonStillRunning);

        self.ended = true;
        Ok(self.leaderboard
            .first()
            .map(|top| WinnerInfo::from_top_game(top, self.season_id)))
    }
}

/// Per-wallet account holding the write-once team choice
#[account]
pub struct UserAccount {
    pub user: Pubkey,
    pub team: Option<TeamType>,
    pub bump: u8,
}

impl UserAccount {
    pub const LEN: usize = 8 + 32 + 2 + 1 + 8;
}

/// Per-wallet, per-season participation
#[account]
pub struct UserSeasonAccount {
    pub user: Pubkey,
    pub season_id: u32,
    pub registered: bool,
    pub games_played: u32,
    pub highest_score: u32,
    pub bump: u8,
}

impl UserSeasonAccount {
    pub const LEN: usize = 8 + 32 + 4 + 1 + 4 + 4 + 1 + 8;
}

/// Game session bound to one ticket mint
#[account]
pub struct GameAccount {
    pub ticket_mint: Pubkey,
    pub season_id: u32,
    /// Wallet that registered the session; the ticket may have moved since
    pub player: Pubkey,
    pub board: [[u16; BOARD_SIZE]; BOARD_SIZE],
    pub score: u32,
    pub top_tile: u16,
    pub move_count: u32,
    pub finished: bool,
    pub bump: u8,
}

impl GameAccount {
    pub const LEN: usize = 8 + // discriminator
        32 +  // ticket_mint
        4 +   // season_id
        32 +  // player
        2 * BOARD_SIZE * BOARD_SIZE + // board
        4 +   // score
        2 +   // top_tile
        4 +   // move_count
        1 +   // finished
        1 +   // bump
        16;   // padding

    pub fn to_board(&self) -> Board {
        Board { cells: self.board, score: self.score, top_tile: self.top_tile }
    }

    pub fn store_board(&mut self, board: &Board) {
        self.board = board.cells;
        self.score = board.score;
        self.top_tile = board.top_tile;
    }

    pub fn seed(&self) -> [u8; 32] {
        self.ticket_mint.to_bytes()
    }

    /// Leaderboard entry for this session as submitted by `player`
    pub fn top_game(&self, player: Pubkey, team: TeamType) -> TopGame {
        TopGame {
            game: self.ticket_mint,
            player,
            team,
            score: self.score,
            top_tile: self.top_tile,
            moves: self.move_count,
        }
    }
}

/// Winner slot or hall-of-fame entry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct WinnerInfo {
    pub user: Pubkey,
    pub team: TeamType,
    pub season_id: u32,
    pub score: u32,
    pub top_tile: u16,
}

impl WinnerInfo {
    pub const LEN: usize = 32 + 1 + 4 + 4 + 2;

    pub fn from_top_game(game: &TopGame, season_id: u32) -> Self {
        Self {
            user: game.player,
            team: game.team,
            season_id,
            score: game.score,
            top_tile: game.top_tile,
        }
    }

    pub fn rank(&self) -> (u32, u16) {
        (self.score, self.top_tile)
    }
}

/// Singleton winner account
#[account]
pub struct WinnerAccount {
    /// Winner of the most recently closed season
    pub season_winner: Option<WinnerInfo>,
    /// Best run of each player who reached the winning tile
    pub hall_of_fame: Vec<WinnerInfo>,
    pub max_winner_count: u8,
    pub bump: u8,
}

impl WinnerAccount {
    pub const LEN: usize = 8 + // discriminator
        1 + WinnerInfo::LEN + // season_winner
        4 + MAX_WINNER_COUNT * WinnerInfo::LEN + // hall_of_fame
        1 +   // max_winner_count
        1 +   // bump
        16;   // padding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_type_round_trips_through_logic_team() {
        for team in [TeamType::MemeTeam, TeamType::ChainTeam] {
            let logic: Team = team.into();
            assert_eq!(TeamType::from(logic), team);
        }
    }

    #[test]
    fn test_game_board_conversion() {
        let mut game = GameAccount {
            ticket_mint: Pubkey::new_from_array([7; 32]),
            season_id: 1,
            player: Pubkey::default(),
            board: [[0; BOARD_SIZE]; BOARD_SIZE],
            score: 0,
            top_tile: 2,
            move_count: 0,
            finished: false,
            bump: 255,
        };

        let mut cells = [[0u16; BOARD_SIZE]; BOARD_SIZE];
        cells[0][0] = 8;
        let board = Board { cells, score: 12, top_tile: 8 };
        game.store_board(&board);

        assert_eq!(game.to_board(), board);
        assert_eq!(game.seed(), [7; 32]);
    }

    #[test]
    fn test_require_live_window() {
        let config = ConfigAccount {
            current_season_id: 3,
            season_active: true,
            current_season_started_at: 100,
            current_season_ends_at: 200,
            ..Default::default()
        };

        assert!(config.require_live(3, 100).is_ok());
        assert!(config.require_live(3, 199).is_ok());
        assert!(config.require_live(3, 200).is_err());
        assert!(config.require_live(3, 99).is_err());
        assert!(config.require_live(2, 150).is_err());
    }

    #[test]
    fn test_serialized_sizes_fit() {
        let season = SeasonAccount {
            season_id: 1,
            started_at: 0,
            ends_at: 0,
            ended: false,
            total_games: 0,
            leaderboard: vec![
                TopGame {
                    game: Pubkey::default(),
                    player: Pubkey::default(),
                    team: TeamType::MemeTeam,
                    score: 0,
                    top_tile: 0,
                    moves: 0,
                };
                LEADERBOARD_CAPACITY
            ],
            bump: 0,
        };
        let mut bytes = Vec::new();
        AnchorSerialize::serialize(&season, &mut bytes).unwrap();
        assert!(8 + bytes.len() <= SeasonAccount::LEN);

        let info = WinnerInfo {
            user: Pubkey::default(),
            team: TeamType::ChainTeam,
            season_id: 1,
            score: 0,
            top_tile: 0,
        };
        let winner = WinnerAccount {
            season_winner: Some(info),
            hall_of_fame: vec![info; MAX_WINNER_COUNT],
            max_winner_count: MAX_WINNER_COUNT as u8,
            bump: 0,
        };
        let mut bytes = Vec::new();
        AnchorSerialize::serialize(&winner, &mut bytes).unwrap();
        assert!(8 + bytes.len() <= WinnerAccount::LEN);
    }

    fn season(season_id: u32, ends_at: i64) -> SeasonAccount {
        SeasonAccount {
            season_id,
            started_at: 0,
            ends_at,
            ended: false,
            total_games: 0,
            leaderboard: Vec::new(),
            bump: 0,
        }
    }

    fn team(total_score: u64, total_moves: u64) -> TeamAccount {
        TeamAccount {
            team: TeamType::MemeTeam,
            base_url: "https://assets.example/me".to_string(),
            num_players: 3,
            total_score,
            total_moves,
            bump: 254,
        }
    }

    #[test]
    fn test_start_requires_previous_season_over() {
        let mut config = ConfigAccount {
            current_season_id: 1,
            season_active: true,
            current_season_started_at: 100,
            current_season_ends_at: 200,
            ..Default::default()
        };
        assert!(config.require_can_start(300).is_err());

        config.season_active = false;
        assert!(config.require_can_start(50).is_err());
        assert!(config.require_can_start(199).is_err());
        assert!(config.require_can_start(200).is_ok());
    }

    #[test]
    fn test_end_without_season_is_no_active_season() {
        let config = ConfigAccount::default();
        let err = config.open_season(None).err().unwrap();
        assert_eq!(err, error!(GameError::NoActiveSeason));

        let config = ConfigAccount {
            current_season_id: 2,
            season_active: true,
            ..Default::default()
        };
        assert!(config.open_season(None).is_err());
        let mut stale = season(1, 100);
        assert!(config.open_season(Some(&mut stale)).is_err());
        let mut current = season(2, 100);
        assert_eq!(config.open_season(Some(&mut current)).unwrap().season_id, 2);
    }

    #[test]
    fn test_close_season_after_end_time() {
        let mut current = season(4, 100);
        assert!(current.close(99).is_err());
        assert!(!current.ended);

        let player = Pubkey::new_from_array([9; 32]);
        current.leaderboard.push(TopGame {
            game: Pubkey::new_from_array([7; 32]),
            player,
            team: TeamType::ChainTeam,
            score: 512,
            top_tile: 64,
            moves: 40,
        });
        let winner = current.close(100).unwrap().unwrap();
        assert!(current.ended);
        assert_eq!(winner.user, player);
        assert_eq!(winner.season_id, 4);
        assert_eq!(winner.rank(), (512, 64));

        assert!(current.close(101).is_err());
    }

    #[test]
    fn test_team_record_move_accumulates() {
        let mut account = team(10, 2);
        account.record_move(8).unwrap();
        account.record_move(0).unwrap();

        assert_eq!(account.total_score, 18);
        assert_eq!(account.total_moves, 4);
        assert_eq!(account.num_players, 3);
        assert_eq!(account.to_record().team, Team::Meme);
    }

    #[test]
    fn test_team_record_move_overflow_leaves_totals() {
        let mut account = team(u64::MAX - 1, 7);
        assert!(account.record_move(4).is_err());
        assert_eq!(account.total_score, u64::MAX - 1);
        assert_eq!(account.total_moves, 7);
    }

    #[test]
    fn test_top_game_is_keyed_by_ticket_mint() {
        let ticket_mint = Pubkey::new_from_array([7; 32]);
        let player = Pubkey::new_from_array([1; 32]);
        let game = GameAccount {
            ticket_mint,
            season_id: 1,
            player,
            board: [[0; BOARD_SIZE]; BOARD_SIZE],
            score: 96,
            top_tile: 32,
            move_count: 11,
            finished: false,
            bump: 255,
        };

        let entry = game.top_game(player, TeamType::MemeTeam);
        assert_eq!(entry.game, ticket_mint);
        assert_eq!(entry.score, 96);
        assert_eq!(entry.top_tile, 32);
        assert_eq!(entry.moves, 11);
    }
}
