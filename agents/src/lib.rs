pub mod agent;
pub mod random;
pub mod heuristic;


pub use agent::{legal_placements, Agent};
pub use random::RandomAgent;
pub use heuristic::HeuristicAgent;
