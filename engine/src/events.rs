// ═══════════════════════════════════════════════════════════════════════
// Game events and sinks
//
// The engine reports what happens through an injected EventSink. With no
// sink installed the events are simply dropped.
// ═══════════════════════════════════════════════════════════════════════

use crate::character::Character;
use crate::player::PlayerId;
use crate::types::{ResolutionKind, ScoreReason};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, first_player: PlayerId },
    RoleAssigned { player: PlayerId, role: Character },
    CardsDealt { player: PlayerId, count: usize },
    CircleStarted { round: u32, circle: u32 },
    CardPlaced { player: PlayerId, placed: usize, seats: usize },
    CircleRevealed { round: u32, circle: u32, queued: Vec<(PlayerId, ResolutionKind)> },
    SwordResolved { player: PlayerId, target: PlayerId, success: bool },
    SwordBlocked { player: PlayerId },
    ShieldResolved { player: PlayerId, target: Option<PlayerId> },
    CoinsAwarded { player: PlayerId, reason: ScoreReason, coins: u32, total: u32 },
    RoundEnded { round: u32 },
    GameEnded { winner: PlayerId, coins: u32 },
}

pub trait EventSink: Send {
    fn record(&mut self, event: &GameEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { round, first_player } => {
                info!(round, %first_player, "round started");
            }
            GameEvent::RoleAssigned { player, role } => {
                debug!(%player, %role, "role assigned");
            }
            GameEvent::CardsDealt { player, count } => {
                debug!(%player, count, "cards dealt");
            }
            GameEvent::CircleStarted { round, circle } => {
                info!(round, circle, "circle started");
            }
            GameEvent::CardPlaced { player, placed, seats } => {
                debug!(%player, placed, seats, "card placed face down");
            }
            GameEvent::CircleRevealed { round, circle, queued } => {
                info!(round, circle, queued = queued.len(), "circle revealed");
            }
            GameEvent::SwordResolved { player, target, success } => {
                info!(%player, %target, success, "sword resolved");
            }
            GameEvent::SwordBlocked { player } => {
                info!(%player, "sword blocked, no legal target");
            }
            GameEvent::ShieldResolved { player, target } => {
                info!(%player, target = ?target, "shield resolved");
            }
            GameEvent::CoinsAwarded { player, reason, coins, total } => {
                info!(%player, %reason, coins, total, "coins awarded");
            }
            GameEvent::RoundEnded { round } => {
                info!(round, "round ended");
            }
            GameEvent::GameEnded { winner, coins } => {
                info!(%winner, coins, "game over");
            }
        }
    }
}
