//! Slot recommendation: filter slots by length, split respondents into
//! available and unavailable, score, and rank.

pub mod eligibility;
pub mod engine;
pub mod ranker;
pub mod resolver;
pub mod scorer;

pub use engine::{recommend_from_snapshot, RecommendationEngine};
