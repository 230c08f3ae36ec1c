// Hybrid resume/job match scoring.
// ML dimension scoring (skills, experience, education, semantic) blended with
// LLM judgment. Providers are reached only through the gateway.

pub mod aggregator;
pub mod blender;
pub mod education;
pub mod error;
pub mod experience;
pub mod fairness;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod providers;
pub mod similarity;
pub mod skills;
pub mod taxonomy;
pub mod weights;

// Re-export the public API consumed by the service shell.
pub use aggregator::MlScorer;
pub use blender::HybridMatcher;
pub use error::MatchError;
pub use gateway::{LlmGateway, LlmProvider};
