// ═══════════════════════════════════════════════════════════════════════
// Core types shared by the engine, views and snapshots
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{Card, CardKind};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

// ── Phase ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    #[serde(rename = "circle_phase")]
    Circle,
    #[serde(rename = "resolving_phase")]
    Resolving,
    RoundEnd,
    GameEnd,
}

impl Phase {
    /// Whether `process_action` accepts input in this phase.
    pub fn in_play(self) -> bool {
        matches!(self, Phase::Circle | Phase::Resolving)
    }
}

// ── Options ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Defaults to the player count, so every seat leads one round.
    pub max_rounds: Option<u32>,
    /// Drawn from the thread RNG when absent.
    pub seed: Option<u64>,
    /// Install the bundled tracing sink.
    pub enable_logging: bool,
}

// ── Actions ────────────────────────────────────────────────────────────

/// Player input. In the circle phase a variant picks the card to place
/// face down (sword/shield targets are ignored there); in the resolving
/// phase `Sword`/`Shield` declare the target of the committed card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Reveal { card_index: usize },
    Sword { target: Option<PlayerId> },
    Shield { target: Option<PlayerId> },
    Hill,
}

impl Action {
    pub fn reveal(card_index: usize) -> Self {
        Action::Reveal { card_index }
    }

    /// Place a sword face down.
    pub fn sword() -> Self {
        Action::Sword { target: None }
    }

    /// Resolve a committed sword against `target`.
    pub fn strike(target: impl Into<PlayerId>) -> Self {
        Action::Sword { target: Some(target.into()) }
    }

    /// Place a shield face down, or resolve it without naming anyone.
    pub fn shield() -> Self {
        Action::Shield { target: None }
    }

    /// Resolve a committed shield against `attacker`.
    pub fn defend(attacker: impl Into<PlayerId>) -> Self {
        Action::Shield { target: Some(attacker.into()) }
    }

    pub fn hill() -> Self {
        Action::Hill
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Reveal { .. } => "reveal",
            Action::Sword { .. } => "sword",
            Action::Shield { .. } => "shield",
            Action::Hill => "hill",
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    CardPlaced,
    SwordUsed { target: PlayerId, success: bool },
    /// Every opponent had already shielded against the attacker.
    SwordBlocked,
    ShieldUsed { target: Option<PlayerId> },
}

// ── Circle table ───────────────────────────────────────────────────────

/// A face-down card waiting for the circle to be revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub card_index: usize,
    pub kind: CardKind,
    pub action: Action,
    /// Position in placement order within the circle.
    pub order: usize,
}

/// A flipped card on the table for the current circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedPlacement {
    pub card: Card,
    pub order: usize,
}

// ── Resolution queue ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    Sword,
    Shield,
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionKind::Sword => write!(f, "sword"),
            ResolutionKind::Shield => write!(f, "shield"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedResolution {
    pub seat: usize,
    pub kind: ResolutionKind,
}

/// Public form of a queue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub player_id: PlayerId,
    pub kind: ResolutionKind,
}

// ── History ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub player_id: PlayerId,
    pub action: Action,
    pub outcome: ActionOutcome,
    pub round: u32,
    pub circle: u32,
    pub timestamp_ms: u64,
}

// ── Scoring ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    /// Sword landed on the character the attacker was hunting.
    SuccessfulHunt,
    /// Shield named the hunter who actually attacked.
    DefendedFromHunter,
    /// Hill card still in hand at round end.
    KeptHill,
}

impl ScoreReason {
    pub fn coins(self) -> u32 {
        match self {
            ScoreReason::SuccessfulHunt => 3,
            ScoreReason::DefendedFromHunter => 2,
            ScoreReason::KeptHill => 1,
        }
    }
}

impl std::fmt::Display for ScoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreReason::SuccessfulHunt => write!(f, "successful hunt"),
            ScoreReason::DefendedFromHunter => write!(f, "defended from hunter"),
            ScoreReason::KeptHill => write!(f, "kept hill"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub id: PlayerId,
    pub coins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEndResult {
    pub winner: PlayerId,
    pub winner_coins: u32,
    /// Seat order.
    pub final_scores: Vec<FinalScore>,
}
