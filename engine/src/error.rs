// ═══════════════════════════════════════════════════════════════════════
// Error types
//
// EngineError: structural misuse (bad setup, lifecycle out of order,
// broken snapshots). Callers are expected to avoid these, not retry.
//
// RuleViolation: ordinary illegal moves. Returned from process_action
// with the game untouched; the caller may retry with corrected input.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::DeckError;
use crate::character::CharacterError;
use crate::player::PlayerId;
use crate::types::{Phase, ResolutionKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("the game supports 4 to 6 players, got {0}")]
    PlayerCount(usize),

    #[error("player id {0:?} appears more than once")]
    DuplicatePlayer(PlayerId),

    #[error("the game has already started")]
    AlreadyStarted,

    #[error("a round is still in progress ({0:?})")]
    RoundInProgress(Phase),

    #[error("maximum number of rounds reached ({max})")]
    MaxRoundsReached { max: u32 },

    #[error("the game is over")]
    GameOver,

    #[error("dealt deck does not match the table: {0}")]
    DeckComposition(String),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Character(#[from] CharacterError),

    #[error("snapshot encoding failed")]
    Snapshot(#[source] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("the game is not in progress")]
    NotInProgress,

    #[error("player {0:?} is not at this table")]
    UnknownPlayer(PlayerId),

    #[error("you have already placed a card this circle")]
    AlreadyPlaced,

    #[error("card index {index} is out of range (hand holds {hand_size})")]
    InvalidCardIndex { index: usize, hand_size: usize },

    #[error("only hint cards can be revealed")]
    NotAHint,

    #[error("sword already used this round")]
    SwordAlreadyUsed,

    #[error("no sword card in hand")]
    NoSwordInHand,

    #[error("shield already used this round")]
    ShieldAlreadyUsed,

    #[error("no shield card in hand")]
    NoShieldInHand,

    #[error("no hill card in hand")]
    NoHillInHand,

    #[error("it is not your turn to resolve (waiting on {0:?})")]
    NotYourTurn(PlayerId),

    #[error("your queued action is a {expected}; submit a {expected} action")]
    WrongResolution { expected: ResolutionKind },

    #[error("a sword needs a target")]
    TargetRequired,

    #[error("target {0:?} not found")]
    UnknownTarget(PlayerId),

    #[error("you cannot attack yourself")]
    SelfAttack,

    #[error("you cannot shield against yourself")]
    SelfShield,

    #[error("{0:?} has already shielded against you")]
    TargetShielded(PlayerId),

    #[error("{0:?} attacked someone else; you cannot defend against them")]
    ShieldContradiction(PlayerId),
}
