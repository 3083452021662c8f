// ═══════════════════════════════════════════════════════════════════════
// Batch — many seeded games in parallel, aggregated per seat
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, GameResult};
use pechenka_agents::{Agent, HeuristicAgent, RandomAgent};
use pechenka_engine::{GameOptions, PlayerId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Which agents fill the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Random,
    Heuristic,
    /// Heuristic on even seats, random on odd ones.
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent type {0:?}, expected random, heuristic or mixed")]
pub struct UnknownAgent(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "heuristic" => Ok(AgentKind::Heuristic),
            "mixed" => Ok(AgentKind::Mixed),
            _ => Err(UnknownAgent(s.to_string())),
        }
    }
}

/// Default seat ids: p1, p2, ...
pub fn player_ids(count: usize) -> Vec<PlayerId> {
    (1..=count).map(|i| format!("p{}", i)).collect()
}

/// One agent per id; agent `i` is seeded with `seed + i`.
pub fn make_agents(kind: AgentKind, ids: &[PlayerId], seed: u64) -> Vec<Box<dyn Agent>> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| -> Box<dyn Agent> {
            let agent_seed = seed.wrapping_add(i as u64);
            let heuristic = match kind {
                AgentKind::Random => false,
                AgentKind::Heuristic => true,
                AgentKind::Mixed => i % 2 == 0,
            };
            if heuristic {
                Box::new(HeuristicAgent::new(id.clone(), agent_seed))
            } else {
                Box::new(RandomAgent::new(id.clone(), agent_seed))
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub games: u32,
    pub players: usize,
    pub agent: AgentKind,
    /// Game `g` runs with seed `base_seed + g * 1000`.
    pub base_seed: u64,
    pub max_rounds: Option<u32>,
    pub max_decisions: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            games: 100,
            players: 4,
            agent: AgentKind::Random,
            base_seed: 42,
            max_rounds: None,
            max_decisions: 10_000,
        }
    }
}

impl BatchConfig {
    pub fn seed_for(&self, game: u32) -> u64 {
        self.base_seed.wrapping_add(game as u64 * 1000)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub player_id: PlayerId,
    pub wins: u32,
    pub mean_coins: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: u32,
    pub completed: u32,
    /// (seed, message) for every game that failed.
    pub errors: Vec<(u64, String)>,
    pub seats: Vec<SeatSummary>,
    /// Wins keyed by agent name.
    pub agent_wins: BTreeMap<String, u32>,
}

/// Run `config.games` games on the rayon pool.
pub fn run_batch(config: &BatchConfig) -> BatchSummary {
    info!(games = config.games, players = config.players, agent = ?config.agent, "batch started");
    let ids = player_ids(config.players);

    let outcomes: Vec<(u64, Result<GameResult, String>)> = (0..config.games)
        .into_par_iter()
        .map(|g| {
            let seed = config.seed_for(g);
            let mut agents = make_agents(config.agent, &ids, seed);
            let options = GameOptions {
                seed: Some(seed),
                max_rounds: config.max_rounds,
                enable_logging: false,
            };
            let result = run_game(&mut agents, &ids, options, config.max_decisions).map_err(|e| e.to_string());
            (seed, result)
        })
        .collect();

    let summary = summarize(config.games, &ids, outcomes);
    info!(completed = summary.completed, errors = summary.errors.len(), "batch finished");
    summary
}

fn summarize(games: u32, ids: &[PlayerId], outcomes: Vec<(u64, Result<GameResult, String>)>) -> BatchSummary {
    let mut wins = vec![0u32; ids.len()];
    let mut coins = vec![0u64; ids.len()];
    let mut agent_wins: BTreeMap<String, u32> = BTreeMap::new();
    let mut errors = Vec::new();
    let mut completed = 0u32;

    for (seed, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                completed += 1;
                for (seat, pr) in result.player_results.iter().enumerate() {
                    coins[seat] += pr.coins as u64;
                    if pr.player_id == result.winner {
                        wins[seat] += 1;
                        *agent_wins.entry(pr.agent_name.clone()).or_insert(0) += 1;
                    }
                }
            }
            Err(message) => {
                warn!(seed, %message, "game failed");
                errors.push((seed, message));
            }
        }
    }

    let seats = ids
        .iter()
        .enumerate()
        .map(|(seat, id)| SeatSummary {
            player_id: id.clone(),
            wins: wins[seat],
            mean_coins: if completed > 0 { coins[seat] as f64 / completed as f64 } else { 0.0 },
        })
        .collect();

    BatchSummary { games, completed, errors, seats, agent_wins }
}
