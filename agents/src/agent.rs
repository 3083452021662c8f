// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface every automated player implements
//
// Agents receive a `PlayerView`, never the `Game`. The view carries the
// public table plus the agent's own role and hand, so an agent never
// sees:
//   - other players' roles or hands
//   - face-down placements before the circle flips
//   - the hints set aside at the deal
// ═══════════════════════════════════════════════════════════════════════

use pechenka_engine::visibility::{PendingDecision, PlayerView};
use pechenka_engine::{Action, PlayerId};

pub trait Agent: Send + Sync {
    /// Strategy name, e.g. "Random".
    fn name(&self) -> &str;

    /// Seat this agent plays.
    fn player_id(&self) -> &str;

    /// Answer whatever the engine is waiting on. `None` when the view
    /// holds no pending decision for this agent.
    fn decide(&mut self, view: &PlayerView) -> Option<Action> {
        let action = match view.pending.as_ref()? {
            PendingDecision::PlaceCard => self.place_card(view),
            PendingDecision::ResolveSword { valid_targets } => match self.choose_sword_target(view, valid_targets) {
                Some(target) => Action::strike(target),
                None => Action::sword(),
            },
            PendingDecision::ResolveShield { valid_targets } => match self.choose_shield_target(view, valid_targets) {
                Some(attacker) => Action::defend(attacker),
                None => Action::shield(),
            },
        };
        Some(action)
    }

    // ── Individual decisions ───────────────────────────────────────────

    /// Pick a card to place face down this circle.
    fn place_card(&mut self, view: &PlayerView) -> Action;

    /// Whom the committed sword strikes. Only `None` when `valid_targets`
    /// is empty.
    fn choose_sword_target(&mut self, view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId>;

    /// Whom the committed shield defends against. `None` names nobody.
    fn choose_shield_target(&mut self, view: &PlayerView, valid_targets: &[PlayerId]) -> Option<PlayerId>;
}

/// Every placement the engine would accept from the viewer right now.
pub fn legal_placements(view: &PlayerView) -> Vec<Action> {
    let Some(private) = view.private.as_ref() else {
        return Vec::new();
    };
    let me = view.me();
    let mut actions: Vec<Action> = private
        .hand
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_hint())
        .map(|(i, _)| Action::reveal(i))
        .collect();

    if !me.used_sword && private.hand.iter().any(|c| c.is_sword()) {
        actions.push(Action::sword());
    }
    if !me.used_shield && private.hand.iter().any(|c| c.is_shield()) {
        actions.push(Action::shield());
    }
    if private.hand.iter().any(|c| c.is_hill()) {
        actions.push(Action::hill());
    }
    actions
}
