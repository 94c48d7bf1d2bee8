// Service exports
pub mod reference_data;

pub use reference_data::{DataLoadError, HospitalIndex, ReferenceData, ZipIndex};
