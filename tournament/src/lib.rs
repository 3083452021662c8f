pub mod runner;
pub mod batch;


pub use runner::{drive, run_game, GameResult, PlayerResult, RunError};
pub use batch::{make_agents, player_ids, run_batch, AgentKind, BatchConfig, BatchSummary, SeatSummary};
