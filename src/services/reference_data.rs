use crate::core::{error::RankError, stats::PopulationStats};
use crate::models::{Coordinates, HospitalRecord, ZipCode, ZipCodeRecord};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the static reference tables
///
/// Any of these is fatal: the service must not answer requests without
/// a complete, validated dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {table} table: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row in {table} table (line {line}): {reason}")]
    InvalidRow {
        table: &'static str,
        line: u64,
        reason: String,
    },

    #[error("The {0} table is empty")]
    Empty(&'static str),

    #[error("Population standard deviation of {0} is zero")]
    DegenerateMetric(&'static str),
}

const ZIP_TABLE: &str = "zip code";
const HOSPITAL_TABLE: &str = "hospital";

/// Raw hospital row: id, lat, lng, c-section %, VBAC %, NICU volume, city, HPSA 0|1
#[derive(Debug, Deserialize)]
struct RawHospitalRow(String, f64, f64, f64, f64, u32, String, u8);

/// Zip code to coordinates index
#[derive(Debug, Clone, Default)]
pub struct ZipIndex {
    entries: HashMap<ZipCode, Coordinates>,
}

impl ZipIndex {
    /// Build the index, later records replacing earlier ones with the same zip
    pub fn from_records<I: IntoIterator<Item = ZipCodeRecord>>(records: I) -> Self {
        let entries = records
            .into_iter()
            .map(|record| (record.zip_code, record.coordinates()))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, zip: ZipCode) -> Result<Coordinates, RankError> {
        self.entries
            .get(&zip)
            .copied()
            .ok_or_else(|| RankError::unknown_zip(zip))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hospital identifier to record index, iterated in identifier order
#[derive(Debug, Clone, Default)]
pub struct HospitalIndex {
    entries: BTreeMap<String, HospitalRecord>,
}

impl HospitalIndex {
    /// Build the index, later records replacing earlier ones with the same id
    pub fn from_records<I: IntoIterator<Item = HospitalRecord>>(records: I) -> Self {
        let entries = records
            .into_iter()
            .map(|record| (record.hospital_id.clone(), record))
            .collect();
        Self { entries }
    }

    pub fn get(&self, hospital_id: &str) -> Option<&HospitalRecord> {
        self.entries.get(hospital_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HospitalRecord> + Clone {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable reference data shared by every ranking request
#[derive(Debug, Clone)]
pub struct ReferenceData {
    zip_codes: ZipIndex,
    hospitals: HospitalIndex,
    stats: PopulationStats,
}

impl ReferenceData {
    /// Load both tables from header-less CSV files
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        zip_codes_path: P,
        hospitals_path: Q,
    ) -> Result<Self, DataLoadError> {
        let zip_codes = open(zip_codes_path.as_ref())?;
        let hospitals = open(hospitals_path.as_ref())?;

        tracing::debug!(
            "Loading reference data from {} and {}",
            zip_codes_path.as_ref().display(),
            hospitals_path.as_ref().display()
        );

        Self::from_readers(zip_codes, hospitals)
    }

    /// Load both tables from any CSV source
    pub fn from_readers<Z: Read, H: Read>(zip_codes: Z, hospitals: H) -> Result<Self, DataLoadError> {
        let zip_records = read_zip_codes(zip_codes)?;
        let hospital_records = read_hospitals(hospitals)?;

        Self::from_records(zip_records, hospital_records)
    }

    /// Index already-parsed records and compute population statistics
    pub fn from_records(
        zip_records: Vec<ZipCodeRecord>,
        hospital_records: Vec<HospitalRecord>,
    ) -> Result<Self, DataLoadError> {
        let zip_codes = ZipIndex::from_records(zip_records);
        if zip_codes.is_empty() {
            return Err(DataLoadError::Empty(ZIP_TABLE));
        }

        let hospitals = HospitalIndex::from_records(hospital_records);
        let stats = PopulationStats::from_hospitals(hospitals.iter())
            .ok_or(DataLoadError::Empty(HOSPITAL_TABLE))?;

        if let Some(metric) = stats.degenerate_metric() {
            return Err(DataLoadError::DegenerateMetric(metric));
        }

        tracing::info!(
            "Reference data loaded: {} zip codes, {} hospitals",
            zip_codes.len(),
            hospitals.len()
        );
        tracing::info!("Population statistics: {:?}", stats);

        Ok(Self {
            zip_codes,
            hospitals,
            stats,
        })
    }

    /// Coordinates of a zip code
    pub fn lookup_zip(&self, zip: ZipCode) -> Result<Coordinates, RankError> {
        self.zip_codes.lookup(zip)
    }

    pub fn zip_codes(&self) -> &ZipIndex {
        &self.zip_codes
    }

    pub fn hospitals(&self) -> &HospitalIndex {
        &self.hospitals
    }

    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    pub fn into_parts(self) -> (ZipIndex, HospitalIndex, PopulationStats) {
        (self.zip_codes, self.hospitals, self.stats)
    }
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn read_zip_codes<R: Read>(reader: R) -> Result<Vec<ZipCodeRecord>, DataLoadError> {
    let mut reader = csv_reader(reader);
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(|source| DataLoadError::Csv { table: ZIP_TABLE, source })?;
        let line = line_of(&row);
        let (zip, latitude, longitude): (u32, f64, f64) = row
            .deserialize(None)
            .map_err(|source| DataLoadError::Csv { table: ZIP_TABLE, source })?;

        let record = ZipCodeRecord {
            zip_code: ZipCode(zip),
            latitude,
            longitude,
        };
        if !record.coordinates().is_valid() {
            return Err(DataLoadError::InvalidRow {
                table: ZIP_TABLE,
                line,
                reason: format!("coordinates out of range ({}, {})", latitude, longitude),
            });
        }

        records.push(record);
    }

    Ok(records)
}

fn read_hospitals<R: Read>(reader: R) -> Result<Vec<HospitalRecord>, DataLoadError> {
    let mut reader = csv_reader(reader);
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(|source| DataLoadError::Csv { table: HOSPITAL_TABLE, source })?;
        let line = line_of(&row);
        let RawHospitalRow(hospital_id, latitude, longitude, c_section_rate, vbac_rate, nicu_volume, city, hpsa) = row
            .deserialize::<RawHospitalRow>(None)
            .map_err(|source| DataLoadError::Csv { table: HOSPITAL_TABLE, source })?;

        let invalid = |reason: String| DataLoadError::InvalidRow {
            table: HOSPITAL_TABLE,
            line,
            reason,
        };

        if hospital_id.is_empty() {
            return Err(invalid("empty hospital identifier".to_string()));
        }
        if !Coordinates::new(latitude, longitude).is_valid() {
            return Err(invalid(format!("coordinates out of range ({}, {})", latitude, longitude)));
        }
        for (name, rate) in [("c-section rate", c_section_rate), ("VBAC rate", vbac_rate)] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number (got {})", name, rate)));
            }
        }
        let hpsa = match hpsa {
            0 => false,
            1 => true,
            other => return Err(invalid(format!("HPSA flag must be 0 or 1 (got {})", other))),
        };

        records.push(HospitalRecord {
            hospital_id,
            latitude,
            longitude,
            c_section_rate,
            vbac_rate,
            nicu_volume,
            city,
            hpsa,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZIPS: &str = "\
19104,39.9597,-75.1968
8540,40.3573,-74.6672
";

    const HOSPITALS: &str = "\
Penn Medicine,39.9496,-75.1930,24.1,12.5,410,Philadelphia,0
Princeton Medical Center,40.3620,-74.6280,19.8,8.0,120,Plainsboro,1
Lankenau,39.9880,-75.2580,28.3,15.2,260,Wynnewood,0
";

    #[test]
    fn test_load_from_readers() {
        let data = ReferenceData::from_readers(ZIPS.as_bytes(), HOSPITALS.as_bytes()).unwrap();

        assert_eq!(data.zip_codes().len(), 2);
        assert_eq!(data.hospitals().len(), 3);

        let origin = data.lookup_zip(ZipCode(8540)).unwrap();
        assert_eq!(origin, Coordinates::new(40.3573, -74.6672));

        let princeton = data.hospitals().get("Princeton Medical Center").unwrap();
        assert!(princeton.hpsa);
        assert_eq!(princeton.nicu_volume, 120);
        assert_eq!(princeton.city, "Plainsboro");
    }

    #[test]
    fn test_population_stats_computed_on_load() {
        let data = ReferenceData::from_readers(ZIPS.as_bytes(), HOSPITALS.as_bytes()).unwrap();
        let stats = data.stats();

        assert!((stats.nicu.mean - 790.0 / 3.0).abs() < 1e-9);
        assert!((stats.c_section.mean - 72.2 / 3.0).abs() < 1e-9);
        assert!(stats.vbac.std_dev > 0.0);
    }

    #[test]
    fn test_into_parts() {
        let data = ReferenceData::from_readers(ZIPS.as_bytes(), HOSPITALS.as_bytes()).unwrap();
        let expected_stats = *data.stats();

        let (zips, hospitals, stats) = data.into_parts();
        assert!(zips.lookup(ZipCode(19104)).is_ok());
        assert_eq!(hospitals.iter().count(), 3);
        assert_eq!(stats, expected_stats);
    }

    #[test]
    fn test_unknown_zip() {
        let data = ReferenceData::from_readers(ZIPS.as_bytes(), HOSPITALS.as_bytes()).unwrap();

        let err = data.lookup_zip(ZipCode(0)).unwrap_err();
        assert_eq!(err, RankError::UnknownZipCode("00000".to_string()));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let zips = "19104,39.0,-75.0\n19104,39.9597,-75.1968\n";
        let hospitals = format!("{}Lankenau,39.9880,-75.2580,30.0,16.0,300,Wynnewood,1\n", HOSPITALS);

        let data = ReferenceData::from_readers(zips.as_bytes(), hospitals.as_bytes()).unwrap();

        assert_eq!(data.zip_codes().len(), 1);
        assert_eq!(data.lookup_zip(ZipCode(19104)).unwrap().latitude, 39.9597);
        assert_eq!(data.hospitals().len(), 3);
        assert!(data.hospitals().get("Lankenau").unwrap().hpsa);
    }

    #[test]
    fn test_empty_tables_rejected() {
        let err = ReferenceData::from_readers("".as_bytes(), HOSPITALS.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty(ZIP_TABLE)));

        let err = ReferenceData::from_readers(ZIPS.as_bytes(), "".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty(HOSPITAL_TABLE)));
    }

    #[test]
    fn test_malformed_rows_rejected() {
        let err = ReferenceData::from_readers("19104,not-a-number,-75.0\n".as_bytes(), HOSPITALS.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { table: ZIP_TABLE, .. }));

        let err = ReferenceData::from_readers(ZIPS.as_bytes(), "Penn,39.9,-75.1,24.1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { table: HOSPITAL_TABLE, .. }));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let err = ReferenceData::from_readers("19104,95.0,-75.0\n".as_bytes(), HOSPITALS.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidRow { table: ZIP_TABLE, line: 1, .. }));
    }

    #[test]
    fn test_invalid_hpsa_flag_rejected() {
        let hospitals = format!("{}Jefferson,39.95,-75.16,22.0,9.0,500,Philadelphia,2\n", HOSPITALS);
        let err = ReferenceData::from_readers(ZIPS.as_bytes(), hospitals.as_bytes()).unwrap_err();

        assert!(matches!(err, DataLoadError::InvalidRow { table: HOSPITAL_TABLE, line: 4, .. }));
    }

    #[test]
    fn test_degenerate_metric_rejected() {
        let hospitals = "\
A,39.9,-75.1,20.0,10.0,100,Philadelphia,0
B,39.8,-75.2,25.0,10.0,200,Camden,0
";
        let err = ReferenceData::from_readers(ZIPS.as_bytes(), hospitals.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::DegenerateMetric("VBAC rate")));
    }

    #[test]
    fn test_missing_file() {
        let err = ReferenceData::load("does/not/exist.csv", "also/missing.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}
