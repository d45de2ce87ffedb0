//! Player instructions

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{
    self, spl_token_2022::instruction::AuthorityType, Mint, MintTo, SetAuthority, TokenAccount,
    TokenInterface,
};
use tile_logic::{BoardRules, Classic2048};
use crate::state::{
    ConfigAccount, GameAccount, SeasonAccount, TeamAccount, TeamType, UserAccount,
    UserSeasonAccount, CONFIG_SEED, GAME_SEED, SEASON_SEED, USER_SEASON_SEED, USER_SEED,
};
use crate::events::{GameRegistered, TeamChosen};
use crate::error::GameError;

/// Join a team (once per wallet)
#[derive(Accounts)]
pub struct ChooseTeam<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = meme_team,
        has_one = chain_team
    )]
    pub config: Account<'info, ConfigAccount>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(mut)]
    pub meme_team: Account<'info, TeamAccount>,

    #[account(mut)]
    pub chain_team: Account<'info, TeamAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn choose_team(ctx: Context<ChooseTeam>, team: TeamType) -> Result<()> {
    let user_account = &mut ctx.accounts.user_account;

    // write-once
    require!(user_account.team.is_none(), GameError::UserAlreadyOnTeam);

    user_account.user = ctx.accounts.user.key();
    user_account.team = Some(team);
    user_account.bump = ctx.bumps.user_account;

    let team_account = match team {
        TeamType::MemeTeam => &mut ctx.accounts.meme_team,
        TeamType::ChainTeam => &mut ctx.accounts.chain_team,
    };
    team_account.num_players = team_account.num_players
        .checked_add(1)
        .ok_or(GameError::Overflow)?;

    msg!("User {} joined {:?}", user_account.user, team);
    emit!(TeamChosen {
        user: user_account.user,
        team,
        num_players: team_account.num_players,
    });

    Ok(())
}

/// Mint a ticket to the player and open a game session for the current season
#[derive(Accounts)]
pub struct RegisterGame<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, ConfigAccount>,

    #[account(
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Account<'info, UserAccount>,

    #[account(
        mut,
        seeds = [SEASON_SEED, config.current_season_id.to_le_bytes().as_ref()],
        bump = season.bump
    )]
    pub season: Account<'info, SeasonAccount>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserSeasonAccount::LEN,
        seeds = [
            USER_SEASON_SEED,
            user.key().as_ref(),
            config.current_season_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub user_season: Account<'info, UserSeasonAccount>,

    /// One-of-one ticket; the config PDA mints it and then gives up the authority
    #[account(
        init,
        payer = user,
        mint::decimals = 0,
        mint::authority = config,
        mint::token_program = token_program
    )]
    pub ticket_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = user,
        associated_token::mint = ticket_mint,
        associated_token::authority = user,
        associated_token::token_program = token_program
    )]
    pub ticket_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = user,
        space = GameAccount::LEN,
        seeds = [GAME_SEED, ticket_mint.key().as_ref()],
        bump
    )]
    pub game: Account<'info, GameAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn register_game(ctx: Context<RegisterGame>) -> Result<()> {
    let clock = Clock::get()?;
    let user = ctx.accounts.user.key();
    let ticket_mint = ctx.accounts.ticket_mint.key();
    let config = &ctx.accounts.config;

    require!(ctx.accounts.user_account.team.is_some(), GameError::TeamNotChosen);

    let season = &mut ctx.accounts.season;
    config.require_live(season.season_id, clock.unix_timestamp)?;

    let user_season = &mut ctx.accounts.user_season;
    require!(!user_season.registered, GameError::SessionAlreadyRegistered);

    user_season.user = user;
    user_season.season_id = season.season_id;
    user_season.registered = true;
    user_season.games_played = user_season.games_played
        .checked_add(1)
        .ok_or(GameError::Overflow)?;
    user_season.bump = ctx.bumps.user_season;

    season.total_games = season.total_games
        .checked_add(1)
        .ok_or(GameError::Overflow)?;

    let game = &mut ctx.accounts.game;
    game.ticket_mint = ticket_mint;
    game.season_id = season.season_id;
    game.player = user;
    game.store_board(&Classic2048.start(&ticket_mint.to_bytes()));
    game.move_count = 0;
    game.finished = false;
    game.bump = ctx.bumps.game;

    // Mint exactly one ticket, then revoke the mint authority
    let bump = [config.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[CONFIG_SEED, &bump]];

    token_interface::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.ticket_mint.to_account_info(),
                to: ctx.accounts.ticket_account.to_account_info(),
                authority: config.to_account_info(),
            },
            signer_seeds,
        ),
        1,
    )?;

    token_interface::set_authority(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            SetAuthority {
                current_authority: config.to_account_info(),
                account_or_mint: ctx.accounts.ticket_mint.to_account_info(),
            },
            signer_seeds,
        ),
        AuthorityType::MintTokens,
        None,
    )?;

    msg!(
        "User {} registered game {} in season {}",
        user,
        ticket_mint,
        game.season_id,
    );
    emit!(GameRegistered {
        user,
        season_id: game.season_id,
        ticket_mint,
    });

    Ok(())
}
