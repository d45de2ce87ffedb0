//! Maintainer instructions

use anchor_lang::prelude::*;
use tile_logic::{MAX_URL_LEN, MAX_WINNER_COUNT};
use crate::state::{
    ConfigAccount, SeasonAccount, TeamAccount, TeamType, WinnerAccount, CHAIN_TEAM_SEED,
    CONFIG_SEED, DEFAULT_SEASON_DURATION, MEME_TEAM_SEED, SEASON_SEED, WINNER_SEED,
};
use crate::events::{SeasonEnded, SeasonStarted};
use crate::error::GameError;

/// Create the config, both team accounts and the winner account (one-time setup)
#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init_if_needed,
        payer = maintainer,
        space = ConfigAccount::LEN,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, ConfigAccount>,

    #[account(
        init_if_needed,
        payer = maintainer,
        space = TeamAccount::LEN,
        seeds = [CHAIN_TEAM_SEED],
        bump
    )]
    pub chain_team: Account<'info, TeamAccount>,

    #[account(
        init_if_needed,
        payer = maintainer,
        space = TeamAccount::LEN,
        seeds = [MEME_TEAM_SEED],
        bump
    )]
    pub meme_team: Account<'info, TeamAccount>,

    #[account(
        init_if_needed,
        payer = maintainer,
        space = WinnerAccount::LEN,
        seeds = [WINNER_SEED],
        bump
    )]
    pub winner: Account<'info, WinnerAccount>,

    #[account(mut)]
    pub maintainer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize(
    ctx: Context<Initialize>,
    chain_team_url: String,
    meme_team_url: String,
) -> Result<()> {
    require!(!ctx.accounts.config.is_initialized(), GameError::AlreadyInitialized);
    require!(
        chain_team_url.len() <= MAX_URL_LEN && meme_team_url.len() <= MAX_URL_LEN,
        GameError::UrlTooLong
    );

    let clock = Clock::get()?;

    let config = &mut ctx.accounts.config;
    config.maintainer = ctx.accounts.maintainer.key();
    config.current_season_id = 0;
    config.season_duration = DEFAULT_SEASON_DURATION;
    config.season_active = false;
    config.current_season_started_at = clock.unix_timestamp;
    config.current_season_ends_at = clock.unix_timestamp;
    config.chain_team = ctx.accounts.chain_team.key();
    config.meme_team = ctx.accounts.meme_team.key();
    config.winner = ctx.accounts.winner.key();
    config.bump = ctx.bumps.config;

    let chain_team = &mut ctx.accounts.chain_team;
    chain_team.team = TeamType::ChainTeam;
    chain_team.base_url = chain_team_url;
    chain_team.num_players = 0;
    chain_team.total_score = 0;
    chain_team.total_moves = 0;
    chain_team.bump = ctx.bumps.chain_team;

    let meme_team = &mut ctx.accounts.meme_team;
    meme_team.team = TeamType::MemeTeam;
    meme_team.base_url = meme_team_url;
    meme_team.num_players = 0;
    meme_team.total_score = 0;
    meme_team.total_moves = 0;
    meme_team.bump = ctx.bumps.meme_team;

    let winner = &mut ctx.accounts.winner;
    winner.season_winner = None;
    winner.hall_of_fame = Vec::new();
    winner.max_winner_count = MAX_WINNER_COUNT as u8;
    winner.bump = ctx.bumps.winner;

    msg!("Config initialized by {}", config.maintainer);
    Ok(())
}

#[derive(Accounts)]
pub struct UpdateSeasonDuration<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = maintainer @ GameError::UnauthorizedMaintainer
    )]
    pub config: Account<'info, ConfigAccount>,

    pub maintainer: Signer<'info>,
}

/// Applies to seasons started after this call
pub fn update_season_duration(
    ctx: Context<UpdateSeasonDuration>,
    new_season_duration: i64,
) -> Result<()> {
    require!(new_season_duration > 0, GameError::InvalidDuration);

    let config = &mut ctx.accounts.config;
    config.season_duration = new_season_duration;

    msg!("Season duration set to {}s", new_season_duration);
    Ok(())
}

#[derive(Accounts)]
pub struct StartSeason<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = maintainer @ GameError::UnauthorizedMaintainer
    )]
    pub config: Account<'info, ConfigAccount>,

    /// Season `current_season_id + 1`
    #[account(
        init,
        payer = maintainer,
        space = SeasonAccount::LEN,
        seeds = [SEASON_SEED, config.next_season_id().to_le_bytes().as_ref()],
        bump
    )]
    pub season: Account<'info, SeasonAccount>,

    #[account(mut)]
    pub maintainer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn start_season(ctx: Context<StartSeason>, start_time: i64) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let season = &mut ctx.accounts.season;

    config.require_can_start(start_time)?;

    let season_id = config.current_season_id
        .checked_add(1)
        .ok_or(GameError::Overflow)?;
    let ends_at = start_time
        .checked_add(config.season_duration)
        .ok_or(GameError::Overflow)?;

    season.season_id = season_id;
    season.started_at = start_time;
    season.ends_at = ends_at;
    season.ended = false;
    season.total_games = 0;
    season.leaderboard = Vec::new();
    season.bump = ctx.bumps.season;

    config.current_season_id = season_id;
    config.season_active = true;
    config.current_season_started_at = start_time;
    config.current_season_ends_at = ends_at;

    msg!("Season {} started at {}, ends at {}", season_id, start_time, ends_at);
    emit!(SeasonStarted {
        season_id,
        started_at: start_time,
        ends_at,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EndSeason<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = maintainer @ GameError::UnauthorizedMaintainer,
        has_one = winner
    )]
    pub config: Account<'info, ConfigAccount>,

    /// Absent before the first season
    #[account(
        mut,
        seeds = [SEASON_SEED, config.current_season_id.to_le_bytes().as_ref()],
        bump = season.bump
    )]
    pub season: Option<Account<'info, SeasonAccount>>,

    #[account(
        mut,
        seeds = [WINNER_SEED],
        bump = winner.bump
    )]
    pub winner: Account<'info, WinnerAccount>,

    pub maintainer: Signer<'info>,
}

/// Close the current season and record its top leaderboard entry
pub fn end_season(ctx: Context<EndSeason>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let season = config.open_season(ctx.accounts.season.as_deref_mut())?;
    let winner = &mut ctx.accounts.winner;

    let clock = Clock::get()?;
    let season_winner = season.close(clock.unix_timestamp)?;

    config.season_active = false;
    winner.season_winner = season_winner;

    match season_winner {
        Some(w) => msg!("Season {} ended, winner {} with {}", season.season_id, w.user, w.score),
        None => msg!("Season {} ended with an empty leaderboard", season.season_id),
    }
    emit!(SeasonEnded {
        season_id: season.season_id,
        total_games: season.total_games,
        winner: season_winner.map(|w| w.user),
        winning_score: season_winner.map(|w| w.score).unwrap_or(0),
    });

    Ok(())
}
