// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinates, HospitalRecord, NormalizedWeights, QueryRequest, ScoredHospital, Weights, ZipCode, ZipCodeRecord, HPSA_ADVISORY};
pub use requests::{RankHospitalsRequest, WeightsInput};
pub use responses::{ErrorResponse, HealthResponse, HospitalRow, RankHospitalsResponse, COLUMN_NAMES};
