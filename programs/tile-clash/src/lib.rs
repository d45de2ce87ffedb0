//! Tile Clash - seasonal team 2048
//!
//! A Solana program where players pick one of two teams, mint a ticket for
//! each season and play 2048 on chain. Every move adds to the team's totals
//! and finished games compete on a per-season leaderboard.

use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

mod state;
mod instructions;
pub mod events;
mod error;

use instructions::*;
pub use state::{MoveDirection, TeamType};

declare_id!("4a7kPMdQh3ZbSrpN9WXJ7sdc8TfYbTQnEqNBGfFzVfCo");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Tile Clash",
    project_url: "https://tileclash.app",
    contacts: "email:security@tileclash.app",
    policy: "https://tileclash.app/security",
    preferred_languages: "en",
    auditors: "N/A"
}

#[program]
pub mod tile_clash {
    use super::*;

    /// Create the config, team and winner accounts (one-time setup)
    pub fn initialize(
        ctx: Context<Initialize>,
        chain_team_url: String,
        meme_team_url: String,
    ) -> Result<()> {
        instructions::admin::initialize(ctx, chain_team_url, meme_team_url)
    }

    /// Change the length of future seasons (maintainer only)
    pub fn update_season_duration(
        ctx: Context<UpdateSeasonDuration>,
        new_season_duration: i64,
    ) -> Result<()> {
        instructions::admin::update_season_duration(ctx, new_season_duration)
    }

    /// Open the next season (maintainer only)
    pub fn start_season(ctx: Context<StartSeason>, start_time: i64) -> Result<()> {
        instructions::admin::start_season(ctx, start_time)
    }

    /// Close the current season once its end time has passed (maintainer only)
    pub fn end_season(ctx: Context<EndSeason>) -> Result<()> {
        instructions::admin::end_season(ctx)
    }

    /// Join the meme or chain team
    pub fn choose_team(ctx: Context<ChooseTeam>, team: state::TeamType) -> Result<()> {
        instructions::player::choose_team(ctx, team)
    }

    /// Mint a ticket and open this season's game session
    pub fn register_game(ctx: Context<RegisterGame>) -> Result<()> {
        instructions::player::register_game(ctx)
    }

    /// Slide the board; only the current ticket holder may move
    pub fn make_move(ctx: Context<MakeMove>, direction: state::MoveDirection) -> Result<()> {
        instructions::game::make_move(ctx, direction)
    }

    /// Finish the session and enter it on the season leaderboard
    pub fn submit_leaderboard(ctx: Context<SubmitLeaderboard>) -> Result<()> {
        instructions::game::submit_leaderboard(ctx)
    }
}
