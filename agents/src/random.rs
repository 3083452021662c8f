// ═══════════════════════════════════════════════════════════════════════
// Random Agent — picks uniformly among legal moves.
// Baseline opponent and engine stress driver.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{legal_placements, Agent};
use pechenka_engine::visibility::PlayerView;
use pechenka_engine::{Action, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    player_id: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(player_id: impl Into<PlayerId>, seed: u64) -> Self {
        RandomAgent {
            player_id: player_id.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn player_id(&self) -> &str {
        &self.player_id
    }

    fn place_card(&mut self, view: &PlayerView) -> Action {
        legal_placements(view)
            .choose(&mut self.rng)
            .cloned()
            // Only reachable with an empty hand; the engine rejects it.
            .unwrap_or_else(Action::hill)
    }

    fn choose_sword_target(&mut self, _view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId> {
        valid_targets.choose(&mut self.rng).cloned()
    }

    fn choose_shield_target(&mut self, _view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId> {
        if self.rng.gen_bool(0.5) {
            valid_targets.choose(&mut self.rng).cloned()
        } else {
            None
        }
    }
}
