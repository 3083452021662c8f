// ═══════════════════════════════════════════════════════════════════════
// Game Runner — runs a complete headless game with agents
// ═══════════════════════════════════════════════════════════════════════

use pechenka_agents::Agent;
use pechenka_engine::visibility::player_view;
use pechenka_engine::{EngineError, Game, GameOptions, Phase, PlayerId, RuleViolation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("no agent plays {0}")]
    MissingAgent(PlayerId),

    #[error("{agent} agent for {player} chose an illegal action: {violation}")]
    IllegalAction {
        player: PlayerId,
        agent: String,
        violation: RuleViolation,
    },

    #[error("game exceeded {limit} decisions without finishing (round {round})")]
    DecisionLimit { limit: usize, round: u32 },

    #[error("game stuck in {0:?} with nobody to act")]
    Stuck(Phase),
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    pub winner: PlayerId,
    pub winner_coins: u32,
    pub rounds_played: u32,
    pub decisions: usize,
    /// Seat order.
    pub player_results: Vec<PlayerResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player_id: PlayerId,
    pub agent_name: String,
    pub coins: u32,
}

/// Run a complete game. `agents` must hold one agent per player id;
/// a game without `options.seed` gets a fresh one, reported in the result.
pub fn run_game(
    agents: &mut [Box<dyn Agent>],
    player_ids: &[PlayerId],
    mut options: GameOptions,
    max_decisions: usize,
) -> Result<GameResult, RunError> {
    let seed = *options.seed.get_or_insert_with(|| rand::random::<u32>() as u64);
    let mut game = Game::new(player_ids.iter().cloned(), options)?;
    let decisions = drive(&mut game, agents, max_decisions)?;
    Ok(build_result(&mut game, agents, seed, decisions))
}

/// Play `game` to the end: start rounds, ask whichever seat the engine
/// is waiting on, feed the answer back. Returns the decision count.
pub fn drive(game: &mut Game, agents: &mut [Box<dyn Agent>], max_decisions: usize) -> Result<usize, RunError> {
    for player in game.players() {
        if !agents.iter().any(|a| a.player_id() == player.id) {
            return Err(RunError::MissingAgent(player.id.clone()));
        }
    }

    let mut decisions = 0;
    loop {
        match game.phase() {
            Phase::GameEnd => return Ok(decisions),
            Phase::Waiting => game.start_game()?,
            Phase::RoundEnd => game.start_round()?,
            Phase::Circle | Phase::Resolving => {
                let mut acted = false;
                for agent in agents.iter_mut() {
                    let player = agent.player_id().to_string();
                    let Some(view) = player_view(game, &player) else {
                        continue;
                    };
                    let Some(action) = agent.decide(&view) else {
                        continue;
                    };
                    debug!(%player, action = action.name(), round = game.current_round(), "decision");
                    game.process_action(&player, action).map_err(|violation| RunError::IllegalAction {
                        player: player.clone(),
                        agent: agent.name().to_string(),
                        violation,
                    })?;
                    acted = true;
                    break;
                }
                if !acted {
                    return Err(RunError::Stuck(game.phase()));
                }

                decisions += 1;
                if decisions > max_decisions {
                    return Err(RunError::DecisionLimit {
                        limit: max_decisions,
                        round: game.current_round(),
                    });
                }
            }
        }
    }
}

fn build_result(game: &mut Game, agents: &[Box<dyn Agent>], seed: u64, decisions: usize) -> GameResult {
    let end = game.end_game();
    let player_results = end
        .final_scores
        .iter()
        .map(|score| PlayerResult {
            player_id: score.id.clone(),
            agent_name: agents
                .iter()
                .find(|a| a.player_id() == score.id)
                .map(|a| a.name().to_string())
                .unwrap_or_default(),
            coins: score.coins,
        })
        .collect();

    info!(seed, winner = %end.winner, coins = end.winner_coins, decisions, "game finished");
    GameResult {
        seed,
        winner: end.winner,
        winner_coins: end.winner_coins,
        rounds_played: game.current_round(),
        decisions,
        player_results,
    }
}
