pub mod gateway;
pub mod prompt;

pub use gateway::Planner;
