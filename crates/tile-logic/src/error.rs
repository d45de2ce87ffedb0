//! Errors returned by ledger operations

/// Why a ledger operation was rejected. A rejected operation changes nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerError {
    AlreadyInitialized,
    NotInitialized,
    UnauthorizedMaintainer,
    UrlTooLong,
    InvalidDuration,
    /// The current season has not been closed yet
    SeasonNotEnded,
    /// `end_season` called with no open season
    NoActiveSeason,
    /// `end_season` called before the season's end time
    SeasonStillRunning,
    /// Gameplay outside the current season's live window
    SeasonNotActive,
    UserAlreadyOnTeam,
    TeamNotChosen,
    TeamMismatch,
    SessionAlreadyRegistered,
    TicketAlreadyMinted,
    SessionNotFound,
    /// Caller does not currently hold the session's ticket
    TokenOwnershipViolation,
    SessionAlreadyFinished,
    /// The slide moved no tile
    BoardUnchanged,
    GameOver,
    /// An address holds a record of another kind
    AccountTypeMismatch,
    Overflow,
}

impl core::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "the configuration is already initialized"),
            Self::NotInitialized => write!(f, "the configuration is not initialized"),
            Self::UnauthorizedMaintainer => {
                write!(f, "only the maintainer can call this operation")
            }
            Self::UrlTooLong => write!(f, "team url exceeds {} bytes", crate::MAX_URL_LEN),
            Self::InvalidDuration => write!(f, "season duration must be positive"),
            Self::SeasonNotEnded => write!(f, "the current season has not ended"),
            Self::NoActiveSeason => write!(f, "there is no open season"),
            Self::SeasonStillRunning => write!(f, "the season end time has not been reached"),
            Self::SeasonNotActive => write!(f, "the season is not live"),
            Self::UserAlreadyOnTeam => write!(f, "user already on team"),
            Self::TeamNotChosen => write!(f, "user has not chosen a team"),
            Self::TeamMismatch => write!(f, "team record does not match the user's team"),
            Self::SessionAlreadyRegistered => {
                write!(f, "user already registered a game this season")
            }
            Self::TicketAlreadyMinted => write!(f, "ticket mint is already in use"),
            Self::SessionNotFound => write!(f, "no game session for this ticket"),
            Self::TokenOwnershipViolation => write!(f, "a token owner constraint was violated"),
            Self::SessionAlreadyFinished => write!(f, "the game session is already finished"),
            Self::BoardUnchanged => write!(f, "the move does not change the board"),
            Self::GameOver => write!(f, "the game is over"),
            Self::AccountTypeMismatch => write!(f, "address holds a record of another kind"),
            Self::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}

impl std::error::Error for LedgerError {}
