// ═══════════════════════════════════════════════════════════════════════
// Game Engine — round lifecycle, circles, resolution queue, scoring
//
// Architecture:
//   The engine is a synchronous state machine. It never does I/O and
//   never waits. Callers feed player input through `process_action`,
//   one call at a time per game, and read back views or snapshots.
//
// Flow of a round:
//   1. `start_round` rotates the first player, assigns roles, deals
//   2. Circle phase: every seat places one card face down
//   3. When the last seat places, all cards flip at once. Hints and
//      hills go to the revealed piles; swords and shields are queued in
//      seating order from the first player
//   4. Resolving phase: the head of the queue declares its target
//   5. After `player_count` circles the round is scored
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{uses_hills, Card, CardKind, Deck};
use crate::character::{characters_for_player_count, target_of, Character, MAX_PLAYERS, MIN_PLAYERS};
use crate::error::{EngineError, RuleViolation};
use crate::events::{EventSink, GameEvent, TracingSink};
use crate::player::{Player, PlayerId};
use crate::random::{shuffle_seeded, SeededRandom};
use crate::types::*;
use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Game {
    pub(crate) players: Vec<Player>,
    /// id → seat, fixed for the life of the game.
    pub(crate) seats: HashMap<PlayerId, usize>,
    pub(crate) max_rounds: u32,
    pub(crate) current_round: u32,
    pub(crate) current_circle: u32,
    /// Seat of this round's first player.
    pub(crate) first_player: usize,
    pub(crate) phase: Phase,
    /// Face-down placements for the current circle, indexed by seat.
    pub(crate) circle_cards: Vec<Option<Placement>>,
    /// Flipped cards for the current circle, indexed by seat.
    pub(crate) revealed_circle_cards: Vec<Option<RevealedPlacement>>,
    pub(crate) resolving_queue: VecDeque<QueuedResolution>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) rng: SeededRandom,
    pub(crate) winner: Option<usize>,
    pub(crate) sink: Option<Box<dyn EventSink>>,
}

impl Game {
    pub fn new<I, S>(player_ids: I, options: GameOptions) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerId>,
    {
        let players: Vec<Player> = player_ids.into_iter().map(Player::new).collect();
        let player_count = players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(EngineError::PlayerCount(player_count));
        }
        let seats = index_seats(&players)?;

        let max_rounds = match options.max_rounds {
            Some(r) if r > 0 => r,
            _ => player_count as u32,
        };
        let rng = match options.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let sink: Option<Box<dyn EventSink>> = if options.enable_logging {
            Some(Box::new(TracingSink))
        } else {
            None
        };

        Ok(Game {
            players,
            seats,
            max_rounds,
            current_round: 0,
            current_circle: 0,
            first_player: 0,
            phase: Phase::Waiting,
            circle_cards: vec![None; player_count],
            revealed_circle_cards: vec![None; player_count],
            resolving_queue: VecDeque::new(),
            history: Vec::new(),
            rng,
            winner: None,
            sink,
        })
    }

    /// Replace the event sink.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn set_sink(&mut self, sink: Option<Box<dyn EventSink>>) {
        self.sink = sink;
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&event);
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.seat_of(id).map(|seat| &self.players[seat])
    }

    pub fn seat_of(&self, id: &str) -> Option<usize> {
        self.seats.get(id).copied()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn current_circle(&self) -> u32 {
        self.current_circle
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Seat index of the round's first player.
    pub fn first_player_index(&self) -> usize {
        self.first_player
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|seat| &self.players[seat])
    }

    /// The round's nominal first player.
    pub fn current_player(&self) -> &Player {
        &self.players[self.first_player]
    }

    /// Player at the head of the resolution queue, if resolving.
    pub fn next_resolving_player(&self) -> Option<&Player> {
        if self.phase != Phase::Resolving {
            return None;
        }
        self.resolving_queue.front().map(|q| &self.players[q.seat])
    }

    pub fn resolving_queue(&self) -> Vec<QueueEntry> {
        self.resolving_queue
            .iter()
            .map(|q| QueueEntry {
                player_id: self.players[q.seat].id.clone(),
                kind: q.kind,
            })
            .collect()
    }

    /// Whether `seat` still has to place a card this circle.
    pub fn awaiting_placement(&self, seat: usize) -> bool {
        self.phase == Phase::Circle && self.circle_cards.get(seat).map_or(false, |p| p.is_none())
    }

    /// Character the player in `seat` hunts this round.
    pub fn hunted_character(&self, seat: usize) -> Option<Character> {
        let role = self.players.get(seat)?.role?;
        target_of(role, self.players.len()).ok()
    }

    /// Players a sword from `seat` may legally strike right now.
    pub fn sword_targets(&self, seat: usize) -> Vec<PlayerId> {
        let attacker = &self.players[seat].id;
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != seat && !shielded_against(p, attacker))
            .map(|(_, p)| p.id.clone())
            .collect()
    }

    /// Players a shield from `seat` may legally name right now.
    pub fn shield_targets(&self, seat: usize) -> Vec<PlayerId> {
        let defender = &self.players[seat].id;
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != seat && !attacked_elsewhere(p, defender))
            .map(|(_, p)| p.id.clone())
            .collect()
    }

    // ═════════════════════════════════════════════════════════════════════
    // ROUND LIFECYCLE
    // ═════════════════════════════════════════════════════════════════════

    pub fn start_game(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Waiting {
            return Err(EngineError::AlreadyStarted);
        }
        self.start_round()
    }

    pub fn start_round(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::GameEnd => return Err(EngineError::GameOver),
            p if p.in_play() => return Err(EngineError::RoundInProgress(p)),
            _ => {}
        }
        if self.current_round >= self.max_rounds {
            return Err(EngineError::MaxRoundsReached { max: self.max_rounds });
        }

        let player_count = self.players.len();
        let roster = characters_for_player_count(player_count)?;

        self.current_round += 1;
        self.current_circle = 0;
        self.first_player = (self.current_round as usize - 1) % player_count;
        for player in &mut self.players {
            player.reset_for_new_round();
        }
        let first_player = self.players[self.first_player].id.clone();
        self.emit(GameEvent::RoundStarted { round: self.current_round, first_player });

        self.assign_roles(roster);
        self.deal_cards(roster)?;
        self.start_circle();
        Ok(())
    }

    /// One distinct role per seat from a shuffled roster.
    fn assign_roles(&mut self, roster: &[Character]) {
        let mut roles = roster.to_vec();
        shuffle_seeded(&mut roles, self.rng.derive_seed());

        for (seat, &role) in roles.iter().enumerate() {
            self.players[seat].assign_role(role);
            let player = self.players[seat].id.clone();
            self.emit(GameEvent::RoleAssigned { player, role });
        }
    }

    /// Each seat gets one hint per character in play except its own role,
    /// one sword, one shield and (under six players) one hill, in a
    /// shuffled order.
    fn deal_cards(&mut self, roster: &[Character]) -> Result<(), EngineError> {
        let player_count = self.players.len();
        let mut deck = Deck::build(player_count)?;
        deck.shuffle(self.rng.derive_seed());

        for seat in 0..player_count {
            let role = self.players[seat].role;
            let mut cards = Vec::with_capacity(roster.len() + 2);

            for &character in roster.iter().filter(|&&c| Some(c) != role) {
                cards.push(take_card(&mut deck, Card::Hint(character))?);
            }
            cards.push(take_card(&mut deck, Card::Sword)?);
            cards.push(take_card(&mut deck, Card::Shield)?);
            if uses_hills(player_count) {
                cards.push(take_card(&mut deck, Card::Hill)?);
            }

            shuffle_seeded(&mut cards, self.rng.derive_seed());
            let count = cards.len();
            self.players[seat].add_cards(cards);
            let player = self.players[seat].id.clone();
            self.emit(GameEvent::CardsDealt { player, count });
        }

        // What is left is exactly the own-role hints nobody receives.
        let mut residue = deck.draw(deck.remaining())?;
        residue.sort_by_key(|c| c.character());
        let expected: Vec<Card> = roster.iter().map(|&c| Card::Hint(c)).collect();
        if residue != expected {
            return Err(EngineError::DeckComposition(format!(
                "expected one hint per character to remain, found {:?}",
                residue
            )));
        }
        Ok(())
    }

    fn start_circle(&mut self) {
        let player_count = self.players.len();
        self.current_circle += 1;
        self.circle_cards = vec![None; player_count];
        self.revealed_circle_cards = vec![None; player_count];
        self.resolving_queue.clear();
        self.phase = Phase::Circle;
        self.emit(GameEvent::CircleStarted {
            round: self.current_round,
            circle: self.current_circle,
        });
    }

    fn finish_circle(&mut self) {
        if self.current_circle as usize >= self.players.len() {
            self.end_round();
        } else {
            self.start_circle();
        }
    }

    fn end_round(&mut self) {
        self.score_round();
        self.phase = Phase::RoundEnd;
        self.emit(GameEvent::RoundEnded { round: self.current_round });

        if self.current_round >= self.max_rounds {
            self.end_game();
        }
    }

    /// Close the game and report the winner. The first seat in seating
    /// order wins a tie on coins.
    pub fn end_game(&mut self) -> GameEndResult {
        let mut best = 0;
        for (seat, player) in self.players.iter().enumerate().skip(1) {
            if player.coins > self.players[best].coins {
                best = seat;
            }
        }

        if self.phase != Phase::GameEnd {
            self.phase = Phase::GameEnd;
            self.winner = Some(best);
            let winner = self.players[best].id.clone();
            let coins = self.players[best].coins;
            self.emit(GameEvent::GameEnded { winner, coins });
        }

        GameEndResult {
            winner: self.players[best].id.clone(),
            winner_coins: self.players[best].coins,
            final_scores: self
                .players
                .iter()
                .map(|p| FinalScore { id: p.id.clone(), coins: p.coins })
                .collect(),
        }
    }

    // ═════════════════════════════════════════════════════════════════════
    // ACTIONS
    // ═════════════════════════════════════════════════════════════════════

    /// Apply one player action. On `Err` nothing has changed.
    pub fn process_action(&mut self, player_id: &str, action: Action) -> Result<ActionOutcome, RuleViolation> {
        if !self.phase.in_play() {
            return Err(RuleViolation::NotInProgress);
        }
        let seat = self
            .seat_of(player_id)
            .ok_or_else(|| RuleViolation::UnknownPlayer(player_id.to_string()))?;

        match self.phase {
            Phase::Circle => self.place_card(seat, action),
            Phase::Resolving => self.resolve(seat, action),
            _ => Err(RuleViolation::NotInProgress),
        }
    }

    // ── Circle phase ───────────────────────────────────────────────────

    fn place_card(&mut self, seat: usize, action: Action) -> Result<ActionOutcome, RuleViolation> {
        if self.circle_cards[seat].is_some() {
            return Err(RuleViolation::AlreadyPlaced);
        }
        let (card_index, kind) = placement_for(&self.players[seat], &action)?;

        let order = self.circle_cards.iter().flatten().count();
        self.circle_cards[seat] = Some(Placement { card_index, kind, action, order });

        let seats = self.players.len();
        let player = self.players[seat].id.clone();
        self.emit(GameEvent::CardPlaced { player, placed: order + 1, seats });

        if order + 1 == seats {
            self.reveal_circle();
        }
        Ok(ActionOutcome::CardPlaced)
    }

    /// Flip every placement at once.
    fn reveal_circle(&mut self) {
        let player_count = self.players.len();
        let mut queue = Vec::new();

        for seat in 0..player_count {
            let Some(placement) = self.circle_cards[seat].clone() else {
                continue;
            };
            // Hands do not change between placement and reveal, so the
            // index still points at the placed card.
            let player = &mut self.players[seat];
            let card = player.hand.remove(placement.card_index);
            match card.kind() {
                CardKind::Hint | CardKind::Hill => player.revealed_cards.push(card),
                CardKind::Sword => queue.push(QueuedResolution { seat, kind: ResolutionKind::Sword }),
                CardKind::Shield => queue.push(QueuedResolution { seat, kind: ResolutionKind::Shield }),
            }
            self.revealed_circle_cards[seat] = Some(RevealedPlacement { card, order: placement.order });
        }

        let first = self.first_player;
        queue.sort_by_key(|q| (q.seat + player_count - first) % player_count);

        let queued = queue
            .iter()
            .map(|q| (self.players[q.seat].id.clone(), q.kind))
            .collect();
        self.emit(GameEvent::CircleRevealed {
            round: self.current_round,
            circle: self.current_circle,
            queued,
        });

        if queue.is_empty() {
            self.finish_circle();
        } else {
            self.resolving_queue = queue.into();
            self.phase = Phase::Resolving;
        }
    }

    // ── Resolving phase ────────────────────────────────────────────────

    fn resolve(&mut self, seat: usize, action: Action) -> Result<ActionOutcome, RuleViolation> {
        let head = self
            .resolving_queue
            .front()
            .cloned()
            .ok_or(RuleViolation::NotInProgress)?;
        if head.seat != seat {
            return Err(RuleViolation::NotYourTurn(self.players[head.seat].id.clone()));
        }

        let outcome = match head.kind {
            ResolutionKind::Sword => self.resolve_sword(seat, &action)?,
            ResolutionKind::Shield => self.resolve_shield(seat, &action)?,
        };

        self.history.push(HistoryEntry {
            player_id: self.players[seat].id.clone(),
            action,
            outcome: outcome.clone(),
            round: self.current_round,
            circle: self.current_circle,
            timestamp_ms: now_ms(),
        });

        self.resolving_queue.pop_front();
        if self.resolving_queue.is_empty() {
            self.finish_circle();
        }
        Ok(outcome)
    }

    fn resolve_sword(&mut self, seat: usize, action: &Action) -> Result<ActionOutcome, RuleViolation> {
        let target = match action {
            Action::Sword { target } => target.as_deref(),
            _ => return Err(RuleViolation::WrongResolution { expected: ResolutionKind::Sword }),
        };

        let Some(target_id) = target else {
            // Every opponent has shielded against this attacker: the sword
            // is spent without effect.
            if !self.sword_targets(seat).is_empty() {
                return Err(RuleViolation::TargetRequired);
            }
            let player = self.players[seat].id.clone();
            self.players[seat].used_sword = true;
            self.emit(GameEvent::SwordBlocked { player });
            return Ok(ActionOutcome::SwordBlocked);
        };

        let target_seat = self
            .seat_of(target_id)
            .ok_or_else(|| RuleViolation::UnknownTarget(target_id.to_string()))?;
        if target_seat == seat {
            return Err(RuleViolation::SelfAttack);
        }
        let attacker_id = self.players[seat].id.clone();
        if shielded_against(&self.players[target_seat], &attacker_id) {
            return Err(RuleViolation::TargetShielded(target_id.to_string()));
        }

        let success = match (self.players[target_seat].role, self.hunted_character(seat)) {
            (Some(role), Some(hunted)) => role == hunted,
            _ => false,
        };
        let attacker = &mut self.players[seat];
        attacker.used_sword = true;
        attacker.sword_target = Some(target_id.to_string());

        self.emit(GameEvent::SwordResolved {
            player: attacker_id,
            target: target_id.to_string(),
            success,
        });
        Ok(ActionOutcome::SwordUsed { target: target_id.to_string(), success })
    }

    fn resolve_shield(&mut self, seat: usize, action: &Action) -> Result<ActionOutcome, RuleViolation> {
        let target = match action {
            Action::Shield { target } => target.clone(),
            _ => return Err(RuleViolation::WrongResolution { expected: ResolutionKind::Shield }),
        };

        let defender_id = self.players[seat].id.clone();
        if let Some(target_id) = &target {
            let target_seat = self
                .seat_of(target_id)
                .ok_or_else(|| RuleViolation::UnknownTarget(target_id.clone()))?;
            if target_seat == seat {
                return Err(RuleViolation::SelfShield);
            }
            if attacked_elsewhere(&self.players[target_seat], &defender_id) {
                return Err(RuleViolation::ShieldContradiction(target_id.clone()));
            }
        }

        let defender = &mut self.players[seat];
        defender.used_shield = true;
        defender.shield_target = target.clone();

        self.emit(GameEvent::ShieldResolved { player: defender_id, target: target.clone() });
        Ok(ActionOutcome::ShieldUsed { target })
    }

    // ═════════════════════════════════════════════════════════════════════
    // SCORING
    // ═════════════════════════════════════════════════════════════════════

    fn score_round(&mut self) {
        let mut awards: Vec<(usize, ScoreReason)> = Vec::new();

        for (seat, player) in self.players.iter().enumerate() {
            if player.used_sword && self.landed_hunt(seat) {
                awards.push((seat, ScoreReason::SuccessfulHunt));
            }
            if player.used_shield && self.defended_from_hunter(seat) {
                awards.push((seat, ScoreReason::DefendedFromHunter));
            }
            if player.has_hill() {
                awards.push((seat, ScoreReason::KeptHill));
            }
        }

        for (seat, reason) in awards {
            let player = &mut self.players[seat];
            player.coins += reason.coins();
            let event = GameEvent::CoinsAwarded {
                player: player.id.clone(),
                reason,
                coins: reason.coins(),
                total: player.coins,
            };
            self.emit(event);
        }
    }

    fn round_history(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        let round = self.current_round;
        self.history.iter().filter(move |h| h.round == round)
    }

    /// The player's sword this round struck the character they hunt.
    fn landed_hunt(&self, seat: usize) -> bool {
        let id = &self.players[seat].id;
        self.round_history()
            .filter(|h| &h.player_id == id)
            .filter_map(|h| match &h.outcome {
                ActionOutcome::SwordUsed { success, .. } => Some(*success),
                _ => None,
            })
            .last()
            .unwrap_or(false)
    }

    /// The player's hunter swung at them, and their shield named that hunter.
    fn defended_from_hunter(&self, seat: usize) -> bool {
        let defender = &self.players[seat];
        let Some(role) = defender.role else {
            return false;
        };
        let Some(hunter_seat) = (0..self.players.len()).find(|&s| self.hunted_character(s) == Some(role)) else {
            return false;
        };
        let hunter = &self.players[hunter_seat];
        if !hunter.used_sword {
            return false;
        }

        let hunter_struck = self.round_history().any(|h| {
            h.player_id == hunter.id
                && matches!(&h.outcome, ActionOutcome::SwordUsed { target, .. } if *target == defender.id)
        });
        let shield_named_hunter = self.round_history().any(|h| {
            h.player_id == defender.id
                && matches!(&h.outcome, ActionOutcome::ShieldUsed { target: Some(t) } if *t == hunter.id)
        });
        hunter_struck && shield_named_hunter
    }
}

// ── Helper functions ───────────────────────────────────────────────────

pub(crate) fn index_seats(players: &[Player]) -> Result<HashMap<PlayerId, usize>, EngineError> {
    let mut seats = HashMap::with_capacity(players.len());
    for (seat, player) in players.iter().enumerate() {
        if seats.insert(player.id.clone(), seat).is_some() {
            return Err(EngineError::DuplicatePlayer(player.id.clone()));
        }
    }
    Ok(seats)
}

fn take_card(deck: &mut Deck, card: Card) -> Result<Card, EngineError> {
    deck.take(card)
        .ok_or_else(|| EngineError::DeckComposition(format!("ran out of {}", card)))
}

/// Which hand card an action places, or why it cannot.
fn placement_for(player: &Player, action: &Action) -> Result<(usize, CardKind), RuleViolation> {
    match action {
        Action::Reveal { card_index } => {
            let card = player.hand.get(*card_index).ok_or(RuleViolation::InvalidCardIndex {
                index: *card_index,
                hand_size: player.hand.len(),
            })?;
            if !card.is_hint() {
                return Err(RuleViolation::NotAHint);
            }
            Ok((*card_index, CardKind::Hint))
        }
        Action::Sword { .. } => {
            if player.used_sword {
                return Err(RuleViolation::SwordAlreadyUsed);
            }
            let idx = player.hand.iter().position(|c| c.is_sword()).ok_or(RuleViolation::NoSwordInHand)?;
            Ok((idx, CardKind::Sword))
        }
        Action::Shield { .. } => {
            if player.used_shield {
                return Err(RuleViolation::ShieldAlreadyUsed);
            }
            let idx = player.hand.iter().position(|c| c.is_shield()).ok_or(RuleViolation::NoShieldInHand)?;
            Ok((idx, CardKind::Shield))
        }
        Action::Hill => {
            let idx = player.hand.iter().position(|c| c.is_hill()).ok_or(RuleViolation::NoHillInHand)?;
            Ok((idx, CardKind::Hill))
        }
    }
}

/// `player` has already shielded against `attacker` this round.
fn shielded_against(player: &Player, attacker: &str) -> bool {
    player.used_shield && player.shield_target.as_deref() == Some(attacker)
}

/// `player` has already struck someone other than `defender` this round.
/// A blocked sword struck nobody.
fn attacked_elsewhere(player: &Player, defender: &str) -> bool {
    player.used_sword && player.sword_target.as_deref().map_or(false, |t| t != defender)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
