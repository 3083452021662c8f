// ═══════════════════════════════════════════════════════════════════════
// Cards and the per-round deck
// ═══════════════════════════════════════════════════════════════════════

use crate::character::{characters_for_player_count, Character, CharacterError, MAX_PLAYERS};
use crate::random::{shuffle, SeededRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Card ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Hint,
    Sword,
    Shield,
    Hill,
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardKind::Hint => write!(f, "hint"),
            CardKind::Sword => write!(f, "sword"),
            CardKind::Shield => write!(f, "shield"),
            CardKind::Hill => write!(f, "hill"),
        }
    }
}

/// A card token. Only hints name a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "character", rename_all = "lowercase")]
pub enum Card {
    Hint(Character),
    Sword,
    Shield,
    Hill,
}

impl Card {
    pub fn kind(self) -> CardKind {
        match self {
            Card::Hint(_) => CardKind::Hint,
            Card::Sword => CardKind::Sword,
            Card::Shield => CardKind::Shield,
            Card::Hill => CardKind::Hill,
        }
    }

    /// The character a hint names.
    pub fn character(self) -> Option<Character> {
        match self {
            Card::Hint(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_hint(self) -> bool {
        matches!(self, Card::Hint(_))
    }

    pub fn is_sword(self) -> bool {
        matches!(self, Card::Sword)
    }

    pub fn is_shield(self) -> bool {
        matches!(self, Card::Shield)
    }

    pub fn is_hill(self) -> bool {
        matches!(self, Card::Hill)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Card::Hint(c) => write!(f, "hint({})", c),
            other => write!(f, "{}", other.kind()),
        }
    }
}

// ── Deck ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("not enough cards in the deck: requested {requested}, available {available}")]
    Insufficient { requested: usize, available: usize },
}

/// Whether hill cards are used at this table size.
pub fn uses_hills(player_count: usize) -> bool {
    player_count < MAX_PLAYERS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck for a table of `player_count`: `player_count` hints
    /// per character in play, then swords, shields and (under six players)
    /// hills, `player_count` of each.
    pub fn build(player_count: usize) -> Result<Self, CharacterError> {
        let roster = characters_for_player_count(player_count)?;
        let mut cards = Vec::with_capacity(player_count * (roster.len() + 3));

        for &character in roster {
            cards.extend(std::iter::repeat(Card::Hint(character)).take(player_count));
        }
        cards.extend(std::iter::repeat(Card::Sword).take(player_count));
        cards.extend(std::iter::repeat(Card::Shield).take(player_count));
        if uses_hills(player_count) {
            cards.extend(std::iter::repeat(Card::Hill).take(player_count));
        }

        Ok(Deck { cards })
    }

    /// Shuffle with a generator restarted from `seed`.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = SeededRandom::new(seed);
        shuffle(&mut self.cards, &mut rng);
    }

    /// Remove and return the first `count` cards. All or nothing.
    pub fn draw(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        if count > self.cards.len() {
            return Err(DeckError::Insufficient {
                requested: count,
                available: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..count).collect())
    }

    /// Remove the first card equal to `card`.
    pub fn take(&mut self, card: Card) -> Option<Card> {
        let pos = self.cards.iter().position(|&c| c == card)?;
        Some(self.cards.remove(pos))
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind() == kind).count()
    }
}
