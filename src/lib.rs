//! Delivery Algo - Maternity hospital recommendation service
//!
//! This library ranks nearby maternity hospitals for a user by combining
//! population-standardized quality metrics with travel distance, weighted
//! by the user's own priorities.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank, Ranker, RankError, RankResult, distance::{distance, haversine_distance}};
pub use crate::models::{QueryRequest, ScoredHospital, Weights, ZipCode, RankHospitalsRequest, RankHospitalsResponse};
pub use crate::services::{DataLoadError, ReferenceData};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let miles = haversine_distance(40.0, -75.0, 40.0, -75.0);
        assert_eq!(miles, 0.0);
        assert_eq!(ZipCode(8540).to_string(), "08540");
    }
}
