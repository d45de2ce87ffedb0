use anchor_lang::prelude::*;

use crate::state::{MoveDirection, TeamType};

/// Emitted when the maintainer opens a season
#[event]
pub struct SeasonStarted {
    pub season_id: u32,
    pub started_at: i64,
    pub ends_at: i64,
}

/// Emitted when the maintainer closes a season
#[event]
pub struct SeasonEnded {
    pub season_id: u32,
    pub total_games: u64,
    pub winner: Option<Pubkey>,
    pub winning_score: u32,
}

#[event]
pub struct TeamChosen {
    pub user: Pubkey,
    pub team: TeamType,
    pub num_players: u32,
}

/// Emitted when a ticket is minted and its session opened
#[event]
pub struct GameRegistered {
    pub user: Pubkey,
    pub season_id: u32,
    pub ticket_mint: Pubkey,
}

#[event]
pub struct MoveMade {
    pub ticket_mint: Pubkey,
    pub user: Pubkey,
    pub team: TeamType,
    pub direction: MoveDirection,
    pub gained: u32,
    pub score: u32,
    pub top_tile: u16,
    pub move_count: u32,
}

/// Emitted when a session closes; `rank` is `None` when it did not place
#[event]
pub struct LeaderboardSubmitted {
    pub ticket_mint: Pubkey,
    pub user: Pubkey,
    pub season_id: u32,
    pub score: u32,
    pub rank: Option<u8>,
}
