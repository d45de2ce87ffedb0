//! Gameplay instructions

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};
use tile_logic::{
    insert_ranked, upsert_best, BoardRules, Classic2048, LEADERBOARD_CAPACITY, WINNING_TILE,
};
use crate::state::{
    ConfigAccount, GameAccount, MoveDirection, SeasonAccount, TeamAccount, UserAccount,
    UserSeasonAccount, WinnerAccount, WinnerInfo, CONFIG_SEED, GAME_SEED, SEASON_SEED,
    USER_SEASON_SEED, USER_SEED, WINNER_SEED,
};
use crate::events::{LeaderboardSubmitted, MoveMade};
use crate::error::GameError;

/// The signer must hold the session's ticket right now
fn require_ticket_holder(ticket_account: &TokenAccount, user: &Pubkey) -> Result<()> {
    require!(
        ticket_account.owner == *user && ticket_account.amount == 1,
        GameError::TokenOwnershipViolation
    );
    Ok(())
}

/// Slide the session board one direction
#[derive(Accounts)]
pub struct MakeMove<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = winner
    )]
    pub config: Account<'info, ConfigAccount>,

    #[account(
        mut,
        seeds = [GAME_SEED, ticket_mint.key().as_ref()],
        bump = game.bump,
        has_one = ticket_mint
    )]
    pub game: Account<'info, GameAccount>,

    #[account(
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,

    /// The team account of the caller's chosen team
    #[account(mut)]
    pub user_team: Account<'info, TeamAccount>,

    /// Season account of the wallet that registered the session
    #[account(
        mut,
        seeds = [USER_SEASON_SEED, game.player.as_ref(), game.season_id.to_le_bytes().as_ref()],
        bump = user_season.bump
    )]
    pub user_season: Account<'info, UserSeasonAccount>,

    pub ticket_mint: InterfaceAccount<'info, Mint>,

    #[account(
        constraint = ticket_account.mint == ticket_mint.key() @ GameError::TokenOwnershipViolation
    )]
    pub ticket_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [WINNER_SEED],
        bump = winner.bump
    )]
    pub winner: Account<'info, WinnerAccount>,

    pub user: Signer<'info>,
}

pub fn make_move(ctx: Context<MakeMove>, direction: MoveDirection) -> Result<()> {
    let user = ctx.accounts.user.key();
    require_ticket_holder(&ctx.accounts.ticket_account, &user)?;

    let config = &ctx.accounts.config;
    let game = &mut ctx.accounts.game;
    require!(!game.finished, GameError::SessionAlreadyFinished);

    let clock = Clock::get()?;
    config.require_live(game.season_id, clock.unix_timestamp)?;

    let team = ctx.accounts.user_account.team.ok_or(GameError::TeamNotChosen)?;
    let user_team = &mut ctx.accounts.user_team;
    require!(
        user_team.key() == config.team_ref(team) && user_team.team == team,
        GameError::TeamMismatch
    );

    let board = game.to_board();
    require!(!Classic2048.is_terminal(&board), GameError::GameOver);

    let outcome = Classic2048.apply(&board, direction.into(), &game.seed(), game.move_count);
    require!(outcome.changed, GameError::BoardUnchanged);

    game.store_board(&outcome.board);
    game.move_count = game.move_count
        .checked_add(1)
        .ok_or(GameError::Overflow)?;
    user_team.record_move(outcome.gained)?;

    let user_season = &mut ctx.accounts.user_season;
    user_season.highest_score = user_season.highest_score.max(game.score);

    if game.top_tile >= WINNING_TILE {
        let winner = &mut ctx.accounts.winner;
        let entry = WinnerInfo {
            user,
            team,
            season_id: game.season_id,
            score: game.score,
            top_tile: game.top_tile,
        };
        let capacity = winner.max_winner_count as usize;
        if upsert_best(&mut winner.hall_of_fame, entry, capacity, |e| e.user, |e| e.rank()) {
            msg!("User {} reached {} with score {}", user, game.top_tile, game.score);
        }
    }

    emit!(MoveMade {
        ticket_mint: game.ticket_mint,
        user,
        team,
        direction,
        gained: outcome.gained,
        score: game.score,
        top_tile: game.top_tile,
        move_count: game.move_count,
    });

    Ok(())
}

/// Close the session and enter its score on the season leaderboard
#[derive(Accounts)]
pub struct SubmitLeaderboard<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, ConfigAccount>,

    #[account(
        mut,
        seeds = [GAME_SEED, ticket_mint.key().as_ref()],
        bump = game.bump,
        has_one = ticket_mint
    )]
    pub game: Account<'info, GameAccount>,

    #[account(
        mut,
        seeds = [SEASON_SEED, game.season_id.to_le_bytes().as_ref()],
        bump = season.bump
    )]
    pub season: Account<'info, SeasonAccount>,

    #[account(
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(
        mut,
        seeds = [USER_SEASON_SEED, game.player.as_ref(), game.season_id.to_le_bytes().as_ref()],
        bump = user_season.bump
    )]
    pub user_season: Account<'info, UserSeasonAccount>,

    pub ticket_mint: InterfaceAccount<'info, Mint>,

    #[account(
        constraint = ticket_account.mint == ticket_mint.key() @ GameError::TokenOwnershipViolation
    )]
    pub ticket_account: InterfaceAccount<'info, TokenAccount>,

    pub user: Signer<'info>,
}

pub fn submit_leaderboard(ctx: Context<SubmitLeaderboard>) -> Result<()> {
    let user = ctx.accounts.user.key();
    require_ticket_holder(&ctx.accounts.ticket_account, &user)?;

    let config = &ctx.accounts.config;
    let game = &mut ctx.accounts.game;
    require!(!game.finished, GameError::SessionAlreadyFinished);

    let clock = Clock::get()?;
    config.require_live(game.season_id, clock.unix_timestamp)?;

    let team = ctx.accounts.user_account.team.ok_or(GameError::TeamNotChosen)?;

    let season = &mut ctx.accounts.season;
    let rank = insert_ranked(
        &mut season.leaderboard,
        game.top_game(user, team),
        LEADERBOARD_CAPACITY,
        |e| e.score,
    );
    game.finished = true;

    let user_season = &mut ctx.accounts.user_season;
    user_season.highest_score = user_season.highest_score.max(game.score);

    match rank {
        Some(r) => msg!(
            "Game {} placed #{} in season {} with {}",
            game.ticket_mint,
            r + 1,
            game.season_id,
            game.score
        ),
        None => msg!("Game {} did not place in season {}", game.ticket_mint, game.season_id),
    }
    emit!(LeaderboardSubmitted {
        ticket_mint: game.ticket_mint,
        user,
        season_id: game.season_id,
        score: game.score,
        rank: rank.map(|r| r as u8),
    });

    Ok(())
}
