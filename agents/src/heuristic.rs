// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agent — deduces roles from revealed hints.
// Noticeably stronger than RandomAgent.
//
// Nobody is ever dealt their own role's hint, so each hint a seat
// reveals rules that character out for it. The agent narrows every
// seat's possible roles that way, then:
//   - holds the sword until its target's holder is pinned down, or the
//     last circle forces its hand
//   - answers a sword aimed at it with a shield naming the attacker
//   - never gives up the hill while anything else is playable
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{legal_placements, Agent};
use pechenka_engine::character::characters_for_player_count;
use pechenka_engine::visibility::{ruled_out, PlayerView};
use pechenka_engine::{Action, Character, PlayerId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct HeuristicAgent {
    player_id: PlayerId,
    rng: ChaCha8Rng,
}

impl HeuristicAgent {
    pub fn new(player_id: impl Into<PlayerId>, seed: u64) -> Self {
        HeuristicAgent {
            player_id: player_id.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Possible roles per seat. The viewer's own seat holds exactly its
    /// known role; a seat left with one option pins that character.
    fn candidate_roles(&self, view: &PlayerView) -> Vec<Vec<Character>> {
        let Ok(roster) = characters_for_player_count(view.player_count()) else {
            return Vec::new();
        };
        let mine = view.private.as_ref().map(|p| p.role);

        let mut options: Vec<Vec<Character>> = view
            .public
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| {
                if seat == view.seat {
                    return mine.into_iter().collect();
                }
                let excluded = ruled_out(p);
                roster
                    .iter()
                    .copied()
                    .filter(|c| Some(*c) != mine && !excluded.contains(c))
                    .collect()
            })
            .collect();

        loop {
            let pinned: Vec<(usize, Character)> = options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.len() == 1)
                .map(|(seat, o)| (seat, o[0]))
                .collect();

            let mut changed = false;
            for (seat, character) in pinned {
                for (other, opts) in options.iter_mut().enumerate() {
                    if other != seat && opts.len() > 1 && opts.contains(&character) {
                        opts.retain(|c| *c != character);
                        changed = true;
                    }
                }
            }
            if !changed {
                return options;
            }
        }
    }

    /// Seats that could hold `character`, likeliest first.
    fn suspects(&mut self, view: &PlayerView, character: Character) -> Vec<usize> {
        let options = self.candidate_roles(view);
        let mut seats: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(seat, o)| *seat != view.seat && o.contains(&character))
            .map(|(seat, _)| seat)
            .collect();
        // Break ties randomly, then prefer the most constrained seats.
        seats.shuffle(&mut self.rng);
        seats.sort_by_key(|&seat| options[seat].len());
        seats
    }

    /// Someone whose sword this round landed on the viewer.
    fn struck_me(view: &PlayerView) -> Option<PlayerId> {
        view.public
            .players
            .iter()
            .find(|p| p.used_sword && p.sword_target.as_deref() == Some(view.viewer.as_str()))
            .map(|p| p.id.clone())
    }

    fn pick_from(&self, view: &PlayerView, seats: &[usize], valid_targets: &[PlayerId]) -> Option<PlayerId> {
        seats
            .iter()
            .map(|&seat| &view.public.players[seat].id)
            .find(|id| valid_targets.contains(id))
            .cloned()
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn player_id(&self) -> &str {
        &self.player_id
    }

    fn place_card(&mut self, view: &PlayerView) -> Action {
        let legal = legal_placements(view);
        let Some(private) = view.private.as_ref() else {
            return Action::hill();
        };
        let can_sword = legal.contains(&Action::sword());
        let can_shield = legal.contains(&Action::shield());

        if can_sword {
            let circle = view.public.circle_info.current_circle;
            let last_circle = view.public.circle_info.max_circles;
            // Seats that shielded against us cannot be struck.
            let reachable: Vec<usize> = self
                .suspects(view, private.target)
                .into_iter()
                .filter(|&seat| {
                    let p = &view.public.players[seat];
                    !(p.used_shield && p.shield_target.as_deref() == Some(view.viewer.as_str()))
                })
                .collect();
            if reachable.len() == 1 || circle >= last_circle {
                return Action::sword();
            }
        }
        if can_shield && Self::struck_me(view).is_some() {
            return Action::shield();
        }

        let hints: Vec<&Action> = legal.iter().filter(|a| matches!(a, Action::Reveal { .. })).collect();
        if let Some(&hint) = hints.choose(&mut self.rng) {
            return hint.clone();
        }
        // Out of hints: spend anything before the hill.
        if can_shield {
            Action::shield()
        } else if can_sword {
            Action::sword()
        } else {
            Action::hill()
        }
    }

    fn choose_sword_target(&mut self, view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId> {
        if let Some(private) = view.private.as_ref() {
            let suspects = self.suspects(view, private.target);
            if let Some(id) = self.pick_from(view, &suspects, valid_targets) {
                return Some(id);
            }
        }
        valid_targets.choose(&mut self.rng).cloned()
    }

    fn choose_shield_target(&mut self, view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId> {
        if let Some(attacker) = Self::struck_me(view).filter(|id| valid_targets.contains(id)) {
            return Some(attacker);
        }
        let private = view.private.as_ref()?;
        let suspects = self.suspects(view, private.hunter);
        self.pick_from(view, &suspects, valid_targets)
    }
}
