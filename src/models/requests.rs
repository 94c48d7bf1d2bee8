use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::RankError;
use crate::models::domain::{QueryRequest, Weights, ZipCode};

/// Request to rank hospitals around a zip code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankHospitalsRequest {
    #[validate(length(min = 1, max = 10))]
    #[serde(alias = "zip_code", rename = "zipCode")]
    pub zip_code: String,
    #[serde(alias = "max_distance_miles", rename = "maxDistanceMiles")]
    pub max_distance_miles: f64,
    #[validate(nested)]
    #[serde(default)]
    pub weights: Option<WeightsInput>,
}

/// Importance weights as sent by the client; missing ones fall back to defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WeightsInput {
    #[validate(range(min = 0.0))]
    #[serde(alias = "c_section", rename = "cSection", default)]
    pub c_section: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub vbac: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub nicu: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub closeness: Option<f64>,
}

impl WeightsInput {
    pub fn resolve(&self, defaults: &Weights) -> Weights {
        Weights {
            c_section: self.c_section.unwrap_or(defaults.c_section),
            vbac: self.vbac.unwrap_or(defaults.vbac),
            nicu: self.nicu.unwrap_or(defaults.nicu),
            closeness: self.closeness.unwrap_or(defaults.closeness),
        }
    }
}

impl RankHospitalsRequest {
    /// Convert into a ranking query
    ///
    /// A zip code that is not a number cannot be in the reference table and
    /// is reported the same way as an unknown one.
    pub fn to_query(&self, default_weights: &Weights) -> Result<QueryRequest, RankError> {
        let origin_zip: ZipCode = self
            .zip_code
            .parse()
            .map_err(|_| RankError::UnknownZipCode(self.zip_code.trim().to_string()))?;

        let weights = self
            .weights
            .as_ref()
            .map(|w| w.resolve(default_weights))
            .unwrap_or(*default_weights);

        Ok(QueryRequest {
            origin_zip,
            max_distance_miles: self.max_distance_miles,
            weights,
        })
    }
}
