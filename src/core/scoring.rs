use crate::core::{error::RankError, stats::PopulationStats};
use crate::models::{HospitalRecord, NormalizedWeights, Weights};

/// Rescale the user's importance weights so that they sum to one
///
/// Fails when any weight is negative or non-finite, or when all weights are zero.
pub fn normalize_weights(weights: &Weights) -> Result<NormalizedWeights, RankError> {
    let components = [
        ("cSection", weights.c_section),
        ("vbac", weights.vbac),
        ("nicu", weights.nicu),
        ("closeness", weights.closeness),
    ];

    for (name, value) in components {
        if !value.is_finite() {
            return Err(RankError::InvalidWeights(format!("{} weight must be a finite number", name)));
        }
        if value < 0.0 {
            return Err(RankError::InvalidWeights(format!(
                "{} weight must not be negative (got {})",
                name, value
            )));
        }
    }

    let sum = weights.c_section + weights.vbac + weights.nicu + weights.closeness;
    if sum <= 0.0 {
        return Err(RankError::InvalidWeights("at least one weight must be positive".to_string()));
    }

    Ok(NormalizedWeights {
        c_section: weights.c_section / sum,
        vbac: weights.vbac / sum,
        nicu: weights.nicu / sum,
        closeness: weights.closeness / sum,
    })
}

impl Weights {
    pub fn normalize(&self) -> Result<NormalizedWeights, RankError> {
        normalize_weights(self)
    }
}

/// Calculate the composite ranking score for a hospital
///
/// Scoring formula:
/// score = (
///     b_csec  * (1 - z_csec) +     # Lower c-section rate = higher score
///     b_vbac  * z_vbac +           # Higher VBAC rate = higher score
///     b_nicu  * z_nicu -           # Larger NICU = higher score
///     b_close * distance_miles     # Raw miles, not standardized
/// )
///
/// The result is unbounded and only meaningful relative to other hospitals
/// scored with the same weights.
#[inline]
pub fn score_with(
    hospital: &HospitalRecord,
    stats: &PopulationStats,
    distance_miles: f64,
    weights: &NormalizedWeights,
) -> f64 {
    let z_csec = stats.c_section.z_score(hospital.c_section_rate);
    let z_vbac = stats.vbac.z_score(hospital.vbac_rate);
    let z_nicu = stats.nicu.z_score(hospital.nicu_volume as f64);

    weights.c_section * (1.0 - z_csec) + weights.vbac * z_vbac + weights.nicu * z_nicu
        - weights.closeness * distance_miles
}

/// Normalize `weights` and score a single hospital
///
/// The ranking pipeline normalizes once per request and calls
/// [`score_with`] directly; this is the one-shot form.
pub fn calculate_hospital_score(
    hospital: &HospitalRecord,
    stats: &PopulationStats,
    distance_miles: f64,
    weights: &Weights,
) -> Result<f64, RankError> {
    let normalized = normalize_weights(weights)?;
    Ok(score_with(hospital, stats, distance_miles, &normalized))
}
