//! Report types for benchmark results.
//!
//! A [`BenchReport`] holds the backend roster and one [`BenchmarkCase`] per
//! corpus entry. Best values and totals are derived on demand, never stored.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{Availability, BackendRegistry, Requirement};
use crate::corpus::CorpusEntry;
use crate::error::{Error, Result};

/// File stem used for exported reports.
pub const REPORT_STEM: &str = "png-bench";

/// One backend's outcome for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Size of the encoded file in bytes.
    pub size: u64,

    /// Wall-clock time of the encode call.
    #[serde(with = "duration_micros")]
    pub duration: Duration,
}

/// A measurement tagged with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResult {
    pub backend: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// One corpus entry and its measurements, in backend invocation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkCase {
    pub entry: CorpusEntry,
    pub results: Vec<BackendResult>,
}

impl BenchmarkCase {
    /// Create a case with no results yet.
    #[must_use]
    pub fn new(entry: CorpusEntry) -> Self {
        Self {
            entry,
            results: Vec::new(),
        }
    }

    /// Case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Record a backend's measurement. Each backend may appear once.
    pub fn insert(&mut self, backend: &str, measurement: Measurement) -> Result<()> {
        if self.get(backend).is_some() {
            return Err(Error::Config(format!(
                "backend '{backend}' measured twice for case '{}'",
                self.entry.name
            )));
        }
        self.results.push(BackendResult {
            backend: backend.to_string(),
            measurement,
        });
        Ok(())
    }

    /// Measurement for a backend, if it ran on this case.
    #[must_use]
    pub fn get(&self, backend: &str) -> Option<&Measurement> {
        self.results
            .iter()
            .find(|r| r.backend == backend)
            .map(|r| &r.measurement)
    }

    /// Every backend whose size equals the smallest size. Ties all win.
    #[must_use]
    pub fn best_size_backends(&self) -> Vec<&str> {
        self.all_minimal(|m| m.size)
    }

    /// Every backend whose duration equals the shortest duration. Ties all win.
    #[must_use]
    pub fn best_duration_backends(&self) -> Vec<&str> {
        self.all_minimal(|m| m.duration)
    }

    #[must_use]
    pub fn is_best_size(&self, backend: &str) -> bool {
        self.best_size_backends().contains(&backend)
    }

    #[must_use]
    pub fn is_best_duration(&self, backend: &str) -> bool {
        self.best_duration_backends().contains(&backend)
    }

    fn all_minimal<T: Ord + Copy>(&self, key: impl Fn(&Measurement) -> T) -> Vec<&str> {
        let Some(min) = self.results.iter().map(|r| key(&r.measurement)).min() else {
            return Vec::new();
        };
        self.results
            .iter()
            .filter(|r| key(&r.measurement) == min)
            .map(|r| r.backend.as_str())
            .collect()
    }
}

/// A backend as it appeared in the run roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub requirement: Requirement,
    pub availability: Availability,
}

/// Cumulative size for one backend over the cases it ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    pub backend: String,
    pub bytes: u64,
    pub cases: usize,
}

/// Report for a full benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// All registered backends in column order, available or not.
    pub backends: Vec<BackendInfo>,

    /// Cases in corpus order.
    pub cases: Vec<BenchmarkCase>,

    /// When the run started.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl BenchReport {
    /// Create an empty report with the registry's roster.
    #[must_use]
    pub fn new(registry: &BackendRegistry) -> Self {
        let backends = registry
            .descriptors()
            .iter()
            .map(|d| BackendInfo {
                name: d.name().to_string(),
                requirement: d.requirement(),
                availability: d.availability().clone(),
            })
            .collect();
        Self {
            backends,
            cases: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Column names, in roster order.
    pub fn backend_names(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name.as_str())
    }

    /// Names of backends that were measured.
    #[must_use]
    pub fn available_backends(&self) -> Vec<&str> {
        self.backends
            .iter()
            .filter(|b| b.availability.is_available())
            .map(|b| b.name.as_str())
            .collect()
    }

    /// Per-backend byte totals, in roster order.
    ///
    /// A backend that never ran is omitted rather than reported as zero.
    #[must_use]
    pub fn totals(&self) -> Vec<Total> {
        self.backends
            .iter()
            .filter_map(|b| {
                let sizes: Vec<u64> = self
                    .cases
                    .iter()
                    .filter_map(|c| c.get(&b.name).map(|m| m.size))
                    .collect();
                if sizes.is_empty() {
                    return None;
                }
                Some(Total {
                    backend: b.name.clone(),
                    bytes: sizes.iter().sum(),
                    cases: sizes.len(),
                })
            })
            .collect()
    }

    /// Write `png-bench.json` and `png-bench.csv` into `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;

        let json_path = dir.join(format!("{REPORT_STEM}.json"));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&json_path, json)?;

        let csv_path = dir.join(format!("{REPORT_STEM}.csv"));
        self.write_csv(&csv_path)?;

        Ok((json_path, csv_path))
    }

    /// Write one CSV row per (case, backend) measurement.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "case",
            "width",
            "height",
            "backend",
            "size_bytes",
            "duration_ms",
            "best_size",
            "best_duration",
        ])?;

        for case in &self.cases {
            for result in &case.results {
                let m = &result.measurement;
                wtr.write_record([
                    &case.entry.name,
                    &case.entry.width.to_string(),
                    &case.entry.height.to_string(),
                    &result.backend,
                    &m.size.to_string(),
                    &format!("{:.3}", m.duration.as_secs_f64() * 1e3),
                    &case.is_best_size(&result.backend).to_string(),
                    &case.is_best_duration(&result.backend).to_string(),
                ])?;
            }
        }

        wtr.flush()?;
        Ok(())
    }
}

// Custom serialization for Duration as microseconds
mod duration_micros {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_micros() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u64::deserialize(deserializer)?;
        Ok(Duration::from_micros(micros))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn entry(name: &str) -> CorpusEntry {
        CorpusEntry {
            name: name.to_string(),
            width: 4,
            height: 4,
            raw_path: PathBuf::from(format!("{name}-4x4.raw")),
            reference_path: Some(PathBuf::from(format!("{name}.png"))),
        }
    }

    pub fn m(size: u64, millis: u64) -> Measurement {
        Measurement {
            size,
            duration: Duration::from_millis(millis),
        }
    }

    pub fn case(name: &str, results: &[(&str, u64, u64)]) -> BenchmarkCase {
        let mut case = BenchmarkCase::new(entry(name));
        for &(backend, size, millis) in results {
            case.insert(backend, m(size, millis)).unwrap();
        }
        case
    }

    pub fn info(name: &str, requirement: Requirement, available: bool) -> BackendInfo {
        BackendInfo {
            name: name.to_string(),
            requirement,
            availability: if available {
                Availability::Available
            } else {
                Availability::Unavailable("not built".to_string())
            },
        }
    }

    pub fn report(backends: Vec<BackendInfo>, cases: Vec<BenchmarkCase>) -> BenchReport {
        BenchReport {
            backends,
            cases,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_tie_inclusive_best_size() {
        let case = case("tie", &[("A", 100, 5), ("B", 100, 7), ("C", 150, 3)]);
        assert_eq!(case.best_size_backends(), ["A", "B"]);
        assert!(case.is_best_size("A"));
        assert!(case.is_best_size("B"));
        assert!(!case.is_best_size("C"));
    }

    #[test]
    fn test_best_duration_independent_of_size() {
        let case = case("speed", &[("A", 100, 5), ("B", 100, 3), ("C", 150, 3)]);
        assert_eq!(case.best_duration_backends(), ["B", "C"]);
        assert!(!case.is_best_duration("A"));
    }

    #[test]
    fn test_single_result_is_best() {
        let case = case("solo", &[("A", 10, 1)]);
        assert_eq!(case.best_size_backends(), ["A"]);
        assert_eq!(case.best_duration_backends(), ["A"]);
    }

    #[test]
    fn test_empty_case_has_no_best() {
        let case = BenchmarkCase::new(entry("empty"));
        assert!(case.best_size_backends().is_empty());
        assert!(!case.is_best_size("A"));
    }

    #[test]
    fn test_insert_preserves_order_and_rejects_duplicates() {
        let mut case = case("order", &[("z", 1, 1), ("a", 2, 2)]);
        let order: Vec<&str> = case.results.iter().map(|r| r.backend.as_str()).collect();
        assert_eq!(order, ["z", "a"]);
        assert!(case.insert("z", m(3, 3)).is_err());
        assert_eq!(case.get("z"), Some(&m(1, 1)));
    }

    #[test]
    fn test_totals_skip_absent_backends() {
        let report = report(
            vec![
                info("A", Requirement::Mandatory, true),
                info("B", Requirement::Optional, true),
                info("C", Requirement::Optional, false),
            ],
            vec![
                case("one", &[("A", 100, 1), ("B", 40, 1)]),
                case("two", &[("A", 250, 1)]),
            ],
        );

        let totals = report.totals();
        assert_eq!(
            totals,
            [
                Total { backend: "A".to_string(), bytes: 350, cases: 2 },
                Total { backend: "B".to_string(), bytes: 40, cases: 1 },
            ]
        );
        assert_eq!(report.available_backends(), ["A", "B"]);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(
            vec![info("A", Requirement::Mandatory, true), info("B", Requirement::Mandatory, true)],
            vec![case("one", &[("A", 100, 2), ("B", 100, 1)])],
        );

        let (json_path, csv_path) = report.write_to_dir(&dir.path().join("out")).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["cases"][0]["results"][1]["size"], 100);
        assert_eq!(json["cases"][0]["results"][1]["duration"], 1000);

        let csv = fs::read_to_string(csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "one,4,4,A,100,2.000,true,false");
        assert_eq!(lines[2], "one,4,4,B,100,1.000,true,true");
    }

    #[test]
    fn test_json_roundtrip_keeps_durations() {
        let report = report(
            vec![info("A", Requirement::Mandatory, true)],
            vec![case("one", &[("A", 7, 12)])],
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: BenchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cases, report.cases);
        assert_eq!(back.backends, report.backends);
    }
}
