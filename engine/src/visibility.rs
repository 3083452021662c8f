// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
//   PUBLIC  — coins, hand sizes, revealed hints and hills, sword/shield
//             usage and declared targets, the circle table (placements
//             show as hidden until the circle flips), the queue
//   PRIVATE — a player's own role, hand, target and hunter
//   HIDDEN  — everybody else's role and hand, the set-aside hints
//
// The engine does not decide who may see what. It only offers the
// separate views; callers must release a private view to its owner only.
// Agents MUST only receive a PlayerView, never the Game itself.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{Card, CardKind};
use crate::character::{hunter_of, target_of, Character};
use crate::engine::Game;
use crate::player::PlayerId;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerState {
    pub id: PlayerId,
    pub name: String,
    pub coins: u32,
    pub hand_size: usize,
    pub revealed_cards: Vec<Card>,
    pub used_sword: bool,
    pub used_shield: bool,
    /// Who they struck.
    pub sword_target: Option<PlayerId>,
    /// Who they defended against.
    pub shield_target: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePlayerState {
    pub role: Character,
    pub hand: Vec<Card>,
    pub target: Character,
    pub hunter: Character,
}

/// A card on the table this circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "card", rename_all = "lowercase")]
pub enum PlayedCard {
    Hidden,
    Revealed(Card),
}

impl PlayedCard {
    pub fn kind(self) -> Option<CardKind> {
        match self {
            PlayedCard::Hidden => None,
            PlayedCard::Revealed(card) => Some(card.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCardInfo {
    pub player_id: PlayerId,
    pub player_name: String,
    pub card: PlayedCard,
    /// Placement order within the circle.
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleInfo {
    pub current_circle: u32,
    pub max_circles: u32,
    /// Seats that have placed this circle, in placement order.
    pub players_placed: Vec<PlayerId>,
    pub played_cards: Vec<PlayedCardInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGameState {
    pub players: Vec<PublicPlayerState>,
    pub current_round: u32,
    pub max_rounds: u32,
    pub current_player_index: usize,
    pub phase: Phase,
    pub circle_info: CircleInfo,
    pub resolving_queue: Vec<QueueEntry>,
    pub winner: Option<PlayerId>,
}

/// What the engine is waiting on from a given player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Place one card face down.
    PlaceCard,
    /// Name the target of the committed sword. Empty `valid_targets`
    /// means the sword can only be spent without a target.
    ResolveSword { valid_targets: Vec<PlayerId> },
    /// Optionally name who the committed shield defends against.
    ResolveShield { valid_targets: Vec<PlayerId> },
}

/// Everything one player is allowed to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub seat: usize,
    pub public: PublicGameState,
    /// None before the first round is dealt.
    pub private: Option<PrivatePlayerState>,
    pub pending: Option<PendingDecision>,
}

impl PlayerView {
    pub fn player_count(&self) -> usize {
        self.public.players.len()
    }

    pub fn me(&self) -> &PublicPlayerState {
        &self.public.players[self.seat]
    }
}

impl Game {
    /// Current circle table, hidden placements included.
    pub fn circle_info(&self) -> CircleInfo {
        let mut placed: Vec<(usize, usize)> = self
            .circle_cards
            .iter()
            .enumerate()
            .filter_map(|(seat, p)| p.as_ref().map(|p| (p.order, seat)))
            .collect();
        placed.sort_unstable();

        let played_cards = placed
            .iter()
            .map(|&(order, seat)| {
                let card = match &self.revealed_circle_cards[seat] {
                    Some(revealed) => PlayedCard::Revealed(revealed.card),
                    None => PlayedCard::Hidden,
                };
                PlayedCardInfo {
                    player_id: self.players[seat].id.clone(),
                    player_name: self.players[seat].name.clone(),
                    card,
                    order,
                }
            })
            .collect();

        CircleInfo {
            current_circle: self.current_circle,
            max_circles: self.players.len() as u32,
            players_placed: placed.iter().map(|&(_, seat)| self.players[seat].id.clone()).collect(),
            played_cards,
        }
    }

    /// Public view of the whole table.
    pub fn game_state(&self) -> PublicGameState {
        PublicGameState {
            players: self
                .players
                .iter()
                .map(|p| PublicPlayerState {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    coins: p.coins,
                    hand_size: p.hand.len(),
                    revealed_cards: p.revealed_cards.clone(),
                    used_sword: p.used_sword,
                    used_shield: p.used_shield,
                    sword_target: p.sword_target.clone(),
                    shield_target: p.shield_target.clone(),
                })
                .collect(),
            current_round: self.current_round,
            max_rounds: self.max_rounds,
            current_player_index: self.first_player,
            phase: self.phase,
            circle_info: self.circle_info(),
            resolving_queue: self.resolving_queue(),
            winner: self.winner().map(|p| p.id.clone()),
        }
    }

    /// One player's secrets. Release only to that player.
    pub fn player_private_state(&self, player_id: &str) -> Option<PrivatePlayerState> {
        let player = self.player(player_id)?;
        let role = player.role?;
        let count = self.player_count();
        Some(PrivatePlayerState {
            role,
            hand: player.hand.clone(),
            target: target_of(role, count).ok()?,
            hunter: hunter_of(role, count).ok()?,
        })
    }

    /// The decision the engine needs from `player_id`, if any.
    pub fn pending_for(&self, player_id: &str) -> Option<PendingDecision> {
        let seat = self.seat_of(player_id)?;
        match self.phase {
            Phase::Circle if self.awaiting_placement(seat) => Some(PendingDecision::PlaceCard),
            Phase::Resolving => {
                let head = self.resolving_queue.front()?;
                if head.seat != seat {
                    return None;
                }
                Some(match head.kind {
                    ResolutionKind::Sword => PendingDecision::ResolveSword {
                        valid_targets: self.sword_targets(seat),
                    },
                    ResolutionKind::Shield => PendingDecision::ResolveShield {
                        valid_targets: self.shield_targets(seat),
                    },
                })
            }
            _ => None,
        }
    }
}

/// Build the PlayerView for a specific player.
pub fn player_view(game: &Game, viewer: &str) -> Option<PlayerView> {
    let seat = game.seat_of(viewer)?;
    Some(PlayerView {
        viewer: viewer.to_string(),
        seat,
        public: game.game_state(),
        private: game.player_private_state(viewer),
        pending: game.pending_for(viewer),
    })
}

/// Characters a player can be ruled out as holding, from public
/// information alone. A seat never holds its own role's hint, so every
/// hint it reveals names a character it is not.
pub fn ruled_out(player: &PublicPlayerState) -> Vec<Character> {
    player
        .revealed_cards
        .iter()
        .filter_map(|c| c.character())
        .collect()
}
