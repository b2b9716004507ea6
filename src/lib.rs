pub mod api;
pub mod config;
pub mod error;
pub mod nutrition;
pub mod planner;
pub mod providers;

// Re-export commonly used items
pub use config::GeminiConfig;
pub use error::AppError;
pub use planner::Planner;
pub use providers::gemini::GeminiProvider;
