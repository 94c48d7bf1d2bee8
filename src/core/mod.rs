// Core algorithm exports
pub mod distance;
pub mod error;
pub mod ranker;
pub mod scoring;
pub mod stats;

pub use distance::{distance, haversine_distance, EARTH_RADIUS_MILES};
pub use error::RankError;
pub use ranker::{rank, RankResult, Ranker};
pub use scoring::{calculate_hospital_score, normalize_weights, score_with};
pub use stats::{MetricStats, PopulationStats};
