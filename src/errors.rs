use crate::species::Species;
use schema::Move;
use thiserror::Error;

/// Main error type for the Suimon Arena battle engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    /// Error related to move data lookup or processing
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to species data lookup or processing
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// A rejected request the caller must resolve before retrying
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors related to move data operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the catalog
    #[error("Move not found: {0:?}")]
    MoveNotFound(Move),
    /// Move data is malformed or incomplete
    #[error("Malformed move data: {0}")]
    MalformedData(String),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the catalog
    #[error("Species not found: {0:?}")]
    SpeciesNotFound(Species),
    /// Species data is malformed or incomplete
    #[error("Malformed species data: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleStateError {
    /// Invalid player index
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    /// Battle state is in an inconsistent or corrupted state
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Requests rejected before any state is touched. The host surfaces these
/// to the user, who must fix the underlying condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
    #[error("{player_id}'s champion has fainted (HP 0) and must be healed first")]
    ChampionFainted { player_id: String },
    #[error("{player_id} has not chosen a champion yet")]
    NoChampionSelected { player_id: String },
    #[error("{player_id} already chose {species} and cannot change champions")]
    ChampionAlreadyChosen { player_id: String, species: Species },
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("A player cannot battle themselves")]
    SelfBattle,
    #[error("{player_id}'s champion is already at full HP")]
    AlreadyAtFullHp { player_id: String },
    #[error("{player_id} has no healing items left")]
    NoHealingItems { player_id: String },
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// A player tried to act while it is the other player's turn
    #[error("It is not player {0}'s turn")]
    NotYourTurn(usize),
    /// Action is not valid in the current battle state
    #[error("Battle is not accepting actions")]
    BattleNotAcceptingActions,
    /// The submitting player is not part of this battle
    #[error("{0} is not a participant in this battle")]
    NotAParticipant(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Type alias for Results using SpeciesDataError
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;
