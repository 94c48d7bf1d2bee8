use crate::core::{
    distance::distance,
    error::RankError,
    scoring::{normalize_weights, score_with},
};
use crate::models::{QueryRequest, ScoredHospital};
use crate::services::ReferenceData;
use std::cmp::Ordering;
use std::sync::Arc;

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult {
    pub hospitals: Vec<ScoredHospital>,
    pub total_candidates: usize,
}

/// Rank every hospital within the requested distance of the origin zip code
///
/// # Pipeline Stages
/// 1. Request validation (weights, distance cap)
/// 2. Origin lookup
/// 3. Distance filter (a hospital exactly at the cap is kept)
/// 4. Scoring and HPSA advisory
/// 5. Sort by score descending, then hospital identifier ascending
///
/// Returns an empty list, not an error, when nothing is within range.
pub fn rank(request: &QueryRequest, data: &ReferenceData) -> Result<RankResult, RankError> {
    let weights = normalize_weights(&request.weights)?;

    let max_distance = request.max_distance_miles;
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(RankError::InvalidDistance(format!(
            "maximum distance must be a positive number of miles (got {})",
            max_distance
        )));
    }

    let origin = data.lookup_zip(request.origin_zip)?;
    let stats = data.stats();
    let total_candidates = data.hospitals().len();

    let mut ranked: Vec<ScoredHospital> = data
        .hospitals()
        .iter()
        .filter_map(|hospital| {
            let distance_miles = distance(origin, hospital.coordinates());
            // Written so that a NaN distance is rejected as well
            if !(distance_miles <= max_distance) {
                return None;
            }

            Some(ScoredHospital {
                hospital_id: hospital.hospital_id.clone(),
                city: hospital.city.clone(),
                distance_miles,
                score: score_with(hospital, stats, distance_miles, &weights),
                c_section_rate: hospital.c_section_rate,
                vbac_rate: hospital.vbac_rate,
                nicu_volume: hospital.nicu_volume,
                hpsa: hospital.hpsa,
                hpsa_advisory: hospital.hpsa_advisory().to_string(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.hospital_id.cmp(&b.hospital_id))
    });

    tracing::debug!(
        "Ranked {} of {} hospitals within {} miles of {}",
        ranked.len(),
        total_candidates,
        max_distance,
        request.origin_zip
    );

    Ok(RankResult {
        hospitals: ranked,
        total_candidates,
    })
}

/// Ranking entry point shared by all request handlers
///
/// Holds the reference data behind an `Arc`; cloning is cheap and every
/// clone reads the same immutable dataset.
#[derive(Debug, Clone)]
pub struct Ranker {
    data: Arc<ReferenceData>,
}

impl Ranker {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn rank(&self, request: &QueryRequest) -> Result<RankResult, RankError> {
        rank(request, &self.data)
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }
}
