// ═══════════════════════════════════════════════════════════════════════
// Characters and the hunting chain
//
// Every player count plays on its own closed cycle over a prefix of the
// roster. Smaller games drop characters from the end of the roster, and
// the last character in play hunts Pechenka to close the cycle.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Character {
    Pechenka,
    Blue,
    Strontium,
    ThirtySeven,
    Persians,
    Cosine,
}

impl Character {
    /// Full roster in chain order.
    pub const ALL: [Character; 6] = [
        Character::Pechenka,
        Character::Blue,
        Character::Strontium,
        Character::ThirtySeven,
        Character::Persians,
        Character::Cosine,
    ];

    fn position(self) -> usize {
        match self {
            Character::Pechenka => 0,
            Character::Blue => 1,
            Character::Strontium => 2,
            Character::ThirtySeven => 3,
            Character::Persians => 4,
            Character::Cosine => 5,
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Character::Pechenka => write!(f, "Pechenka"),
            Character::Blue => write!(f, "Blue"),
            Character::Strontium => write!(f, "Strontium"),
            Character::ThirtySeven => write!(f, "37"),
            Character::Persians => write!(f, "Persians"),
            Character::Cosine => write!(f, "Cosine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("the game supports 4 to 6 players, got {0}")]
    PlayerCount(usize),

    #[error("{character} is not in play with {player_count} players")]
    NotInPlay {
        character: Character,
        player_count: usize,
    },
}

fn check_player_count(player_count: usize) -> Result<(), CharacterError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        Ok(())
    } else {
        Err(CharacterError::PlayerCount(player_count))
    }
}

/// Characters in play for a given player count, in chain order.
pub fn characters_for_player_count(player_count: usize) -> Result<&'static [Character], CharacterError> {
    check_player_count(player_count)?;
    Ok(&Character::ALL[..player_count])
}

/// Whether `character` takes part in an `player_count`-player game.
pub fn in_play(character: Character, player_count: usize) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) && character.position() < player_count
}

fn chain_position(character: Character, player_count: usize) -> Result<usize, CharacterError> {
    check_player_count(player_count)?;
    if in_play(character, player_count) {
        Ok(character.position())
    } else {
        Err(CharacterError::NotInPlay { character, player_count })
    }
}

/// The character `character` must strike.
pub fn target_of(character: Character, player_count: usize) -> Result<Character, CharacterError> {
    let pos = chain_position(character, player_count)?;
    Ok(Character::ALL[(pos + 1) % player_count])
}

/// The character hunting `character`.
pub fn hunter_of(character: Character, player_count: usize) -> Result<Character, CharacterError> {
    let pos = chain_position(character, player_count)?;
    Ok(Character::ALL[(pos + player_count - 1) % player_count])
}
