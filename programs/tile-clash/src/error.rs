//! Custom error codes

use anchor_lang::prelude::*;

#[error_code]
pub enum GameError {
    #[msg("The configuration is already initialized")]
    AlreadyInitialized = 6000,

    #[msg("The configuration is not initialized")]
    NotInitialized = 6001,

    #[msg("Only the maintainer can call this instruction")]
    UnauthorizedMaintainer = 6002,

    #[msg("Team url is too long")]
    UrlTooLong = 6003,

    #[msg("Season duration must be positive")]
    InvalidDuration = 6004,

    #[msg("The current season has not ended")]
    SeasonNotEnded = 6005,

    #[msg("There is no open season")]
    NoActiveSeason = 6006,

    #[msg("The season end time has not been reached")]
    SeasonStillRunning = 6007,

    #[msg("The season is not live")]
    SeasonNotActive = 6008,

    #[msg("User already on team")]
    UserAlreadyOnTeam = 6009,

    #[msg("User has not chosen a team")]
    TeamNotChosen = 6010,

    #[msg("Team account does not match the user's team")]
    TeamMismatch = 6011,

    #[msg("User already registered a game this season")]
    SessionAlreadyRegistered = 6012,

    #[msg("Ticket mint is already in use")]
    TicketAlreadyMinted = 6013,

    #[msg("No game session for this ticket")]
    SessionNotFound = 6014,

    #[msg("A token owner constraint was violated")]
    TokenOwnershipViolation = 6015,

    #[msg("The game session is already finished")]
    SessionAlreadyFinished = 6016,

    #[msg("The move does not change the board")]
    BoardUnchanged = 6017,

    #[msg("The game is over")]
    GameOver = 6018,

    #[msg("Arithmetic overflow")]
    Overflow = 6019,
}
