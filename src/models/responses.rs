use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredHospital;

/// Column labels for displaying ranked hospitals as a table
pub const COLUMN_NAMES: [&str; 7] = [
    "Hospital",
    "City",
    "Distance",
    "Cesarean-section rate (%) - Lower is better",
    "Vaginal Birth After C-Section rate (%) - Higher is better",
    "NICU volume per year - Higher is better",
    "Health Professional Shortage Area Status",
];

/// One display row, in the same order as [`COLUMN_NAMES`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalRow {
    pub hospital: String,
    pub city: String,
    /// Distance in miles, two decimals
    pub distance: String,
    #[serde(rename = "cSectionRate")]
    pub c_section_rate: f64,
    #[serde(rename = "vbacRate")]
    pub vbac_rate: f64,
    #[serde(rename = "nicuVolume")]
    pub nicu_volume: u32,
    #[serde(rename = "hpsaStatus")]
    pub hpsa_status: String,
    #[serde(rename = "distanceMiles")]
    pub distance_miles: f64,
    pub score: f64,
}

impl From<ScoredHospital> for HospitalRow {
    fn from(scored: ScoredHospital) -> Self {
        Self {
            hospital: scored.hospital_id,
            city: scored.city,
            distance: format!("{:.2}", scored.distance_miles),
            c_section_rate: scored.c_section_rate,
            vbac_rate: scored.vbac_rate,
            nicu_volume: scored.nicu_volume,
            hpsa_status: scored.hpsa_advisory,
            distance_miles: scored.distance_miles,
            score: scored.score,
        }
    }
}

/// Response for the rank hospitals endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankHospitalsResponse {
    pub columns: Vec<String>,
    pub hospitals: Vec<HospitalRow>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

impl RankHospitalsResponse {
    pub fn new(ranked: Vec<ScoredHospital>) -> Self {
        let hospitals: Vec<HospitalRow> = ranked.into_iter().map(HospitalRow::from).collect();

        Self {
            columns: COLUMN_NAMES.iter().map(|c| c.to_string()).collect(),
            total_results: hospitals.len(),
            hospitals,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub hospitals: usize,
    #[serde(rename = "zipCodes")]
    pub zip_codes: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
