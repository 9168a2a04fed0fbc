use thiserror::Error;

use crate::model::PlayerId;

/// Every way a request can be refused by the engine.
///
/// None of these leave the snapshot half-updated: a transition either returns
/// a complete new game or one of these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("game has already finished")]
    GameAlreadyFinished,
    #[error("game is not in progress")]
    GameNotInProgress,
    #[error("no game has been created")]
    NoGame,
    #[error("game has no players")]
    NoPlayers,
    #[error("player {0} already joined")]
    DuplicatePlayer(PlayerId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("there is no active turn")]
    NoActiveTurn,
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("unknown player secret")]
    Unauthorized,
    #[error("die index {0} is out of range")]
    InvalidDieIndex(usize),
    #[error("die {0} is locked")]
    DieLocked(usize),
    #[error("dice have not been rolled yet")]
    DiceNotRolled,
    #[error("select at least one scoring die first")]
    SelectionRequired,
    #[error("current selection does not score")]
    InvalidSelection,
    #[error("nothing to bank")]
    ZeroScore,
    #[error("need {required} to enter the game, have {available}")]
    MinimumEntryNotMet { required: u32, available: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Stable identifier for callers mapping failures to messages.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::GameAlreadyStarted => "game_already_started",
            EngineError::GameAlreadyFinished => "game_already_finished",
            EngineError::GameNotInProgress => "game_not_in_progress",
            EngineError::NoGame => "no_game",
            EngineError::NoPlayers => "no_players",
            EngineError::DuplicatePlayer(_) => "duplicate_player",
            EngineError::PlayerNotFound(_) => "player_not_found",
            EngineError::NoActiveTurn => "no_active_turn",
            EngineError::NotYourTurn(_) => "not_your_turn",
            EngineError::Unauthorized => "unauthorized",
            EngineError::InvalidDieIndex(_) => "invalid_die_index",
            EngineError::DieLocked(_) => "die_locked",
            EngineError::DiceNotRolled => "dice_not_rolled",
            EngineError::SelectionRequired => "selection_required",
            EngineError::InvalidSelection => "invalid_selection",
            EngineError::ZeroScore => "zero_score",
            EngineError::MinimumEntryNotMet { .. } => "minimum_entry_not_met",
            EngineError::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
