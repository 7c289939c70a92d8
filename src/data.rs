use csv::{ReaderBuilder, Trim, Writer};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::DataLoadError;
use crate::normalize::round2;

pub const SYNTHETIC_SEED: u64 = 42;
pub const SYNTHETIC_RECORDS: usize = 120;

const NOISE_STD_DEV: f64 = 3.0;
const ATTENDANCE_WEIGHT: f64 = 0.45;
const CGPA_WEIGHT: f64 = 0.55;

/// Columns a dataset file must provide. Name and register number are optional.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Attendance", "CGPA_Percentage", "Next_Percentage"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StudentRecord {
    #[serde(rename = "StudentName", default)]
    pub name: String,
    #[serde(rename = "RegisterNo", default)]
    pub register_no: String,
    #[serde(rename = "Attendance")]
    pub attendance: f64,
    #[serde(rename = "CGPA_Percentage")]
    pub cgpa_percentage: f64,
    #[serde(rename = "Next_Percentage")]
    pub next_percentage: f64,
}

/// Training data, fixed once startup has loaded or generated it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDataset {
    records: Vec<StudentRecord>,
}

impl StudentDataset {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature matrix with columns `[attendance, cgpa_percentage]`.
    pub fn features(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.records.len(), 2), |(row, col)| {
            let record = &self.records[row];
            if col == 0 {
                record.attendance
            } else {
                record.cgpa_percentage
            }
        })
    }

    pub fn targets(&self) -> Array1<f64> {
        self.records.iter().map(|r| r.next_percentage).collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), DataLoadError> {
        let write_err = |source: csv::Error| DataLoadError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = Writer::from_path(path).map_err(write_err)?;
        for record in &self.records {
            writer.serialize(record).map_err(write_err)?;
        }
        writer.flush().map_err(|e| write_err(e.into()))?;
        Ok(())
    }
}

/// Where the training data came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    File { path: PathBuf, dataset: StudentDataset },
    Synthetic { seed: u64, dataset: StudentDataset },
}

impl DatasetSource {
    pub fn dataset(&self) -> &StudentDataset {
        match self {
            DatasetSource::File { dataset, .. } | DatasetSource::Synthetic { dataset, .. } => dataset,
        }
    }

    pub fn origin(&self) -> &'static str {
        match self {
            DatasetSource::File { .. } => "file",
            DatasetSource::Synthetic { .. } => "synthetic",
        }
    }
}

/// Reads the dataset at `path`, or generates the seeded synthetic one when
/// no file exists there. A file that exists but is malformed is an error,
/// never a silent fallback.
pub fn load_or_synthesize(path: &Path) -> Result<DatasetSource, DataLoadError> {
    if path.exists() {
        let dataset = load_csv(path)?;
        info!(path = %path.display(), records = dataset.len(), "Loaded student dataset");
        Ok(DatasetSource::File {
            path: path.to_path_buf(),
            dataset,
        })
    } else {
        let dataset = synthesize(SYNTHETIC_SEED, SYNTHETIC_RECORDS);
        info!(
            path = %path.display(),
            seed = SYNTHETIC_SEED,
            records = dataset.len(),
            "No dataset file found, generated synthetic data"
        );
        Ok(DatasetSource::Synthetic {
            seed: SYNTHETIC_SEED,
            dataset,
        })
    }
}

pub fn load_csv(path: &Path) -> Result<StudentDataset, DataLoadError> {
    let open_err = |source: csv::Error| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(open_err)?;

    let headers = rdr.headers().map_err(open_err)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize::<StudentRecord>().enumerate() {
        let record = result.map_err(|source| DataLoadError::Record {
            path: path.to_path_buf(),
            row: index + 1,
            source,
        })?;
        let values = [
            ("Attendance", record.attendance),
            ("CGPA_Percentage", record.cgpa_percentage),
            ("Next_Percentage", record.next_percentage),
        ];
        if let Some(&(column, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataLoadError::NonFinite {
                path: path.to_path_buf(),
                row: index + 1,
                column,
            });
        }
        records.push(record);
    }

    Ok(StudentDataset::new(records))
}

/// Seeded synthetic cohort: attendance in [40, 100), CGPA percentage in
/// [50, 95), next percentage a noisy weighted blend of the two.
pub fn synthesize(seed: u64, count: usize) -> StudentDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let attendance: Vec<f64> = (0..count).map(|_| rng.gen_range(40.0..100.0)).collect();
    let cgpa: Vec<f64> = (0..count).map(|_| rng.gen_range(50.0..95.0)).collect();
    let noise: Vec<f64> = (0..count)
        .map(|_| rng.sample::<f64, _>(StandardNormal) * NOISE_STD_DEV)
        .collect();

    let records = (0..count)
        .map(|i| {
            let next = ATTENDANCE_WEIGHT * attendance[i] + CGPA_WEIGHT * cgpa[i] + noise[i];
            StudentRecord {
                name: format!("Student {}", i + 1),
                register_no: format!("REG{:04}", i + 1),
                attendance: round2(attendance[i]),
                cgpa_percentage: round2(cgpa[i]),
                next_percentage: round2(next.clamp(0.0, 100.0)),
            }
        })
        .collect();

    StudentDataset::new(records)
}

/// Creates the directory that will hold the dataset file. The file itself is
/// left alone.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
