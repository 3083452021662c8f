pub mod character;
pub mod random;
pub mod cards;
pub mod player;
pub mod types;
pub mod error;
pub mod events;
pub mod engine;
pub mod visibility;
pub mod snapshot;


pub use types::*;
pub use cards::{Card, CardKind, Deck, DeckError};
pub use character::Character;
pub use engine::Game;
pub use error::{EngineError, RuleViolation};
pub use events::{EventSink, GameEvent, TracingSink};
pub use player::{Player, PlayerId};
