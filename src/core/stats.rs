use crate::models::HospitalRecord;
use serde::{Deserialize, Serialize};

/// Population mean and standard deviation of a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    #[serde(rename = "stdDev")]
    pub std_dev: f64,
}

impl MetricStats {
    /// Compute population (not sample) statistics
    ///
    /// mean = sum / n, std_dev = sqrt(sum((x - mean)^2) / n).
    /// Returns `None` for an empty input.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();

        let (sum, n) = values
            .clone()
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        if n == 0 {
            return None;
        }

        let count = n as f64;
        let mean = sum / count;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count;

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Number of standard deviations `value` lies from the mean
    #[inline]
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Population statistics of the three quality metrics
///
/// Built once from the full hospital set when the reference data is loaded
/// and shared read-only by every scoring call afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    #[serde(rename = "cSection")]
    pub c_section: MetricStats,
    pub vbac: MetricStats,
    pub nicu: MetricStats,
}

impl PopulationStats {
    /// Returns `None` when `hospitals` is empty
    pub fn from_hospitals<'a, I>(hospitals: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a HospitalRecord>,
        I::IntoIter: Clone,
    {
        let hospitals = hospitals.into_iter();

        Some(Self {
            c_section: MetricStats::from_values(hospitals.clone().map(|h| h.c_section_rate))?,
            vbac: MetricStats::from_values(hospitals.clone().map(|h| h.vbac_rate))?,
            nicu: MetricStats::from_values(hospitals.map(|h| h.nicu_volume as f64))?,
        })
    }

    /// Name of the first metric with zero spread, if any
    pub fn degenerate_metric(&self) -> Option<&'static str> {
        [
            ("c-section rate", self.c_section),
            ("VBAC rate", self.vbac),
            ("NICU volume", self.nicu),
        ]
        .into_iter()
        .find(|(_, stats)| !(stats.std_dev.is_finite() && stats.std_dev > 0.0))
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(c_section_rate: f64, vbac_rate: f64, nicu_volume: u32) -> HospitalRecord {
        HospitalRecord {
            hospital_id: format!("H{}", nicu_volume),
            latitude: 40.0,
            longitude: -75.0,
            c_section_rate,
            vbac_rate,
            nicu_volume,
            city: "Trenton".to_string(),
            hpsa: false,
        }
    }

    #[test]
    fn test_population_std_dev() {
        // Classic example: population std dev of this set is exactly 2
        let stats = MetricStats::from_values(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        assert!(MetricStats::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_z_score() {
        let stats = MetricStats { mean: 20.0, std_dev: 4.0 };
        assert_eq!(stats.z_score(28.0), 2.0);
        assert_eq!(stats.z_score(20.0), 0.0);
        assert_eq!(stats.z_score(18.0), -0.5);
    }

    #[test]
    fn test_population_stats_from_hospitals() {
        let hospitals = vec![hospital(20.0, 10.0, 100), hospital(30.0, 20.0, 300)];
        let stats = PopulationStats::from_hospitals(&hospitals).unwrap();

        assert_eq!(stats.c_section.mean, 25.0);
        assert_eq!(stats.c_section.std_dev, 5.0);
        assert_eq!(stats.vbac.mean, 15.0);
        assert_eq!(stats.nicu.mean, 200.0);
        assert_eq!(stats.nicu.std_dev, 100.0);
        assert_eq!(stats.degenerate_metric(), None);
    }

    #[test]
    fn test_degenerate_metric_detected() {
        let hospitals = vec![hospital(20.0, 10.0, 100), hospital(30.0, 10.0, 300)];
        let stats = PopulationStats::from_hospitals(&hospitals).unwrap();

        assert_eq!(stats.degenerate_metric(), Some("VBAC rate"));
    }
}
