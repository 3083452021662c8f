// ═══════════════════════════════════════════════════════════════════════
// Snapshots — serialize / deserialize
//
// A snapshot holds every engine-observable field, generator state
// included, so a restored game continues exactly as the original would.
// The event sink is not part of it.
// ═══════════════════════════════════════════════════════════════════════

use crate::character::{MAX_PLAYERS, MIN_PLAYERS};
use crate::engine::{index_seats, Game};
use crate::error::EngineError;
use crate::player::Player;
use crate::random::SeededRandom;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub players: Vec<Player>,
    pub max_rounds: u32,
    pub current_round: u32,
    pub current_circle: u32,
    pub current_player_index: usize,
    pub phase: Phase,
    pub circle_cards: Vec<Option<Placement>>,
    pub revealed_circle_cards: Vec<Option<RevealedPlacement>>,
    pub resolving_queue: Vec<QueuedResolution>,
    pub history: Vec<HistoryEntry>,
    pub rng: SeededRandom,
    pub winner: Option<usize>,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self.players.clone(),
            max_rounds: self.max_rounds,
            current_round: self.current_round,
            current_circle: self.current_circle,
            current_player_index: self.first_player,
            phase: self.phase,
            circle_cards: self.circle_cards.clone(),
            revealed_circle_cards: self.revealed_circle_cards.clone(),
            resolving_queue: self.resolving_queue.iter().cloned().collect(),
            history: self.history.clone(),
            rng: self.rng.clone(),
            winner: self.winner,
        }
    }

    /// Rebuild a game from a snapshot. The result has no event sink.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, EngineError> {
        validate(&snapshot)?;
        let seats = index_seats(&snapshot.players)?;

        Ok(Game {
            seats,
            players: snapshot.players,
            max_rounds: snapshot.max_rounds,
            current_round: snapshot.current_round,
            current_circle: snapshot.current_circle,
            first_player: snapshot.current_player_index,
            phase: snapshot.phase,
            circle_cards: snapshot.circle_cards,
            revealed_circle_cards: snapshot.revealed_circle_cards,
            resolving_queue: snapshot.resolving_queue.into(),
            history: snapshot.history,
            rng: snapshot.rng,
            winner: snapshot.winner,
            sink: None,
        })
    }

    /// JSON encoding of `snapshot()`.
    pub fn serialize(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.snapshot()).map_err(EngineError::Snapshot)
    }

    pub fn deserialize(json: &str) -> Result<Self, EngineError> {
        let snapshot: GameSnapshot = serde_json::from_str(json).map_err(EngineError::Snapshot)?;
        Self::from_snapshot(snapshot)
    }
}

fn validate(s: &GameSnapshot) -> Result<(), EngineError> {
    let n = s.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(EngineError::PlayerCount(n));
    }
    let invalid = |msg: String| -> Result<(), EngineError> { Err(EngineError::InvalidSnapshot(msg)) };

    if s.circle_cards.len() != n || s.revealed_circle_cards.len() != n {
        return invalid(format!("circle tables must have {} seats", n));
    }
    if s.current_player_index >= n {
        return invalid(format!("first player seat {} out of range", s.current_player_index));
    }
    if s.resolving_queue.iter().any(|q| q.seat >= n) {
        return invalid("resolution queue names a missing seat".to_string());
    }
    if s.winner.map_or(false, |w| w >= n) {
        return invalid("winner seat out of range".to_string());
    }
    if s.max_rounds == 0 || s.current_round > s.max_rounds {
        return invalid(format!("round {} of {} is impossible", s.current_round, s.max_rounds));
    }
    if s.phase == Phase::Resolving && s.resolving_queue.is_empty() {
        return invalid("resolving phase with an empty queue".to_string());
    }
    match s.phase {
        // Nothing is flipped yet; every placement must still point at
        // its card, and at least one seat must be left to place.
        Phase::Circle => {
            if s.revealed_circle_cards.iter().any(Option::is_some) {
                return invalid("revealed cards during the circle phase".to_string());
            }
            if s.circle_cards.iter().all(Option::is_some) {
                return invalid("every seat placed but the circle never flipped".to_string());
            }
            for (seat, placement) in s.circle_cards.iter().enumerate() {
                let Some(p) = placement else { continue };
                let in_hand = s.players[seat].hand.get(p.card_index).map(|c| c.kind()) == Some(p.kind);
                if !in_hand {
                    return invalid(format!("seat {} placed a card that is not in hand", seat));
                }
            }
        }
        // The circle has flipped: every seat placed and every card is face up.
        Phase::Resolving => {
            let flipped = s
                .circle_cards
                .iter()
                .zip(&s.revealed_circle_cards)
                .all(|(placed, revealed)| placed.is_some() && revealed.is_some());
            if !flipped {
                return invalid("resolving phase with an unrevealed placement".to_string());
            }
        }
        _ => {}
    }
    Ok(())
}
