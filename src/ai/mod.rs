mod agent;
pub mod heuristic;

pub use agent::Agent;
pub use heuristic::{Decision, HeuristicAgent, HeuristicConfig, Rule};
