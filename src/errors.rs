//! Error types shared across the engine.
//!
//! Every fallible public operation returns one of these enums. Illegal moves
//! are a regular outcome of play and carry a human-readable reason through
//! their `Display` implementation.

use thiserror::Error;

/// Failure while compiling a movement-notation string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unexpected token '{token}' in movement notation \"{notation}\"")]
    UnexpectedToken { notation: String, token: char },

    #[error("distance {value} in movement notation \"{notation}\" exceeds the board")]
    DistanceOutOfRange { notation: String, value: u32 },
}

/// Failure while building a position from a formation grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormationError {
    #[error("formation must have 8 files, found {found}")]
    WrongFileCount { found: usize },

    #[error("formation file {file} must have 8 ranks, found {found}")]
    WrongRankCount { file: usize, found: usize },

    #[error("unknown piece \"{name}\" at file {file}, rank {rank}")]
    UnknownPiece { name: String, file: u8, rank: u8 },

    #[error("piece dictionary is missing required kind \"{0}\"")]
    MissingRequiredKind(String),

    #[error("more than one {color} king in formation")]
    TooManyKings { color: &'static str },
}

/// Failure while decoding a textual move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move \"{0}\" must have four coordinates and an optional promotion piece")]
    WrongTokenCount(String),

    #[error("coordinate token \"{0}\" is not a number")]
    NotANumber(String),

    #[error("coordinate {0} is outside the board")]
    OutOfRange(u32),

    #[error("unknown promotion piece \"{0}\"")]
    UnknownPromotion(String),
}

/// Failure while applying or undoing a move on a position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on source square {0}")]
    EmptySource(u8),

    #[error("undo record does not match the most recent move")]
    UndoMismatch,

    #[error("no promotion is pending on square {0}")]
    NoPendingPromotion(u8),

    #[error("\"{0}\" is not a valid promotion piece")]
    InvalidPromotion(String),
}

/// Reason a move was refused by [`crate::game_state::chess_game::ChessGame`].
///
/// The `Display` output is the reason string handed to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("wrong player!")]
    WrongPlayer,

    #[error("same square")]
    SameSquare,

    #[error("wrong figure")]
    WrongFigure,

    #[error("not a legal move")]
    NotLegal,

    #[error("game is finished")]
    GameFinished,

    #[error("promotion pending")]
    PromotionPending,

    #[error("{0}")]
    Parse(#[from] MoveParseError),

    #[error("{0}")]
    Execution(#[from] MoveError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown option \"{0}\"")]
    UnknownOption(String),

    #[error("invalid value \"{value}\" for option \"{name}\"")]
    InvalidOptionValue { name: String, value: String },

    #[error(transparent)]
    Move(#[from] MoveError),
}
