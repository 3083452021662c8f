// ═══════════════════════════════════════════════════════════════════════
// Per-seat player record
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Card;
use crate::character::{hunter_of, target_of, Character, CharacterError};
use serde::{Deserialize, Serialize};

pub type PlayerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Assigned at round start (PRIVATE).
    pub role: Option<Character>,
    /// Cards in hand (PRIVATE).
    pub hand: Vec<Card>,
    /// Hints and hills flipped this round (PUBLIC).
    pub revealed_cards: Vec<Card>,
    /// Persists across rounds.
    pub coins: u32,
    pub used_sword: bool,
    pub used_shield: bool,
    pub sword_target: Option<PlayerId>,
    pub shield_target: Option<PlayerId>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        let id = id.into();
        Player {
            name: format!("Player {}", id),
            id,
            role: None,
            hand: Vec::new(),
            revealed_cards: Vec::new(),
            coins: 0,
            used_sword: false,
            used_shield: false,
            sword_target: None,
            shield_target: None,
        }
    }

    pub fn assign_role(&mut self, role: Character) {
        self.role = Some(role);
    }

    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }

    pub fn has_sword(&self) -> bool {
        self.hand.iter().any(|c| c.is_sword())
    }

    pub fn has_shield(&self) -> bool {
        self.hand.iter().any(|c| c.is_shield())
    }

    pub fn has_hill(&self) -> bool {
        self.hand.iter().any(|c| c.is_hill())
    }

    pub fn has_hint(&self) -> bool {
        self.hand.iter().any(|c| c.is_hint())
    }

    /// Clear everything that lives for one round. Coins are kept.
    pub fn reset_for_new_round(&mut self) {
        self.role = None;
        self.hand.clear();
        self.revealed_cards.clear();
        self.used_sword = false;
        self.used_shield = false;
        self.sword_target = None;
        self.shield_target = None;
    }

    /// Character this player hunts, once a role is assigned.
    pub fn target(&self, player_count: usize) -> Result<Option<Character>, CharacterError> {
        self.role.map(|r| target_of(r, player_count)).transpose()
    }

    /// Character hunting this player, once a role is assigned.
    pub fn hunter(&self, player_count: usize) -> Result<Option<Character>, CharacterError> {
        self.role.map(|r| hunter_of(r, player_count)).transpose()
    }
}
