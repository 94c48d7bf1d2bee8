use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advisory attached to hospitals located in a Health Professional Shortage Area
pub const HPSA_ADVISORY: &str =
    "Alert: This is a registered Health Professional Shortage Area (HPSA).";

/// US zip code, stored as its integer value (leading zeros are not significant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipCode(pub u32);

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

impl FromStr for ZipCode {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(ZipCode)
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside the valid degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

/// One row of the zip code reference table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZipCodeRecord {
    pub zip_code: ZipCode,
    pub latitude: f64,
    pub longitude: f64,
}

impl ZipCodeRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Maternity hospital with its quality metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecord {
    #[serde(rename = "hospitalId")]
    pub hospital_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Low-risk primary c-section rate (%)
    #[serde(rename = "cSectionRate")]
    pub c_section_rate: f64,
    /// Vaginal birth after cesarean rate (%)
    #[serde(rename = "vbacRate")]
    pub vbac_rate: f64,
    /// Annual NICU discharges
    #[serde(rename = "nicuVolume")]
    pub nicu_volume: u32,
    pub city: String,
    /// Located in a registered Health Professional Shortage Area
    pub hpsa: bool,
}

impl HospitalRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// HPSA advisory text, empty when the hospital is not in a shortage area
    pub fn hpsa_advisory(&self) -> &'static str {
        if self.hpsa {
            HPSA_ADVISORY
        } else {
            ""
        }
    }
}

/// User importance weights, on any non-negative scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Importance of a low c-section rate
    #[serde(rename = "cSection")]
    pub c_section: f64,
    /// Importance of a high VBAC rate
    pub vbac: f64,
    /// Importance of a large NICU
    pub nicu: f64,
    /// Importance of the hospital being close by
    pub closeness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            c_section: 5.0,
            vbac: 5.0,
            nicu: 5.0,
            closeness: 5.0,
        }
    }
}

/// Weights rescaled so that they sum to one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    pub c_section: f64,
    pub vbac: f64,
    pub nicu: f64,
    pub closeness: f64,
}

impl NormalizedWeights {
    pub fn sum(&self) -> f64 {
        self.c_section + self.vbac + self.nicu + self.closeness
    }
}

/// One ranking query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    pub origin_zip: ZipCode,
    pub max_distance_miles: f64,
    pub weights: Weights,
}

/// Scored hospital result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHospital {
    #[serde(rename = "hospitalId")]
    pub hospital_id: String,
    pub city: String,
    #[serde(rename = "distanceMiles")]
    pub distance_miles: f64,
    pub score: f64,
    #[serde(rename = "cSectionRate")]
    pub c_section_rate: f64,
    #[serde(rename = "vbacRate")]
    pub vbac_rate: f64,
    #[serde(rename = "nicuVolume")]
    pub nicu_volume: u32,
    pub hpsa: bool,
    #[serde(rename = "hpsaAdvisory")]
    pub hpsa_advisory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_code_parse_and_display() {
        let zip: ZipCode = "08540".parse().unwrap();
        assert_eq!(zip, ZipCode(8540));
        assert_eq!(zip.to_string(), "08540");
        assert_eq!(ZipCode(0).to_string(), "00000");
        assert!("abc".parse::<ZipCode>().is_err());
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(40.0, -75.0).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(90.5, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.1).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_hpsa_advisory() {
        let mut hospital = HospitalRecord {
            hospital_id: "General".to_string(),
            latitude: 40.0,
            longitude: -75.0,
            c_section_rate: 25.0,
            vbac_rate: 10.0,
            nicu_volume: 100,
            city: "Springfield".to_string(),
            hpsa: false,
        };
        assert_eq!(hospital.hpsa_advisory(), "");

        hospital.hpsa = true;
        assert_eq!(hospital.hpsa_advisory(), HPSA_ADVISORY);
    }
}
