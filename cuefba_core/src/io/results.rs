//! Writing and reading sweep results
//!
//! Results are stored as a single bincode encoded [`SweepResults`], and can additionally be
//! exported as one CSV file per table.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::sweep::table::{Record, ResultTable, SweepResults};

/// Default location of the results of a run, relative to the working directory
pub const DEFAULT_RESULTS_PATH: &str = "ecoli_full_model/basic_fba/results.bin";

/// Write `results` to `path`, creating missing parent directories and replacing any existing file
pub fn write_results<P: AsRef<Path>>(path: P, results: &SweepResults) -> Result<(), ResultsIoError> {
    let path = path.as_ref();
    create_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(writer, results)?;
    info!("Wrote sweep results to {}", path.display());
    Ok(())
}

/// Read results written by [`write_results`]
pub fn read_results<P: AsRef<Path>>(path: P) -> Result<SweepResults, ResultsIoError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// Write `nitrogen.csv`, `carbon.csv` and `maintenance.csv` into `directory`
pub fn write_csv_tables<P: AsRef<Path>>(
    directory: P,
    results: &SweepResults,
) -> Result<(), ResultsIoError> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    write_csv_table(&directory.join("nitrogen.csv"), &results.nitrogen)?;
    write_csv_table(&directory.join("carbon.csv"), &results.carbon)?;
    write_csv_table(&directory.join("maintenance.csv"), &results.maintenance)?;
    info!("Wrote CSV tables to {}", directory.display());
    Ok(())
}

fn write_csv_table<R: Record + Serialize>(
    path: &Path,
    table: &ResultTable<R>,
) -> Result<(), ResultsIoError> {
    let mut writer = csv::Writer::from_path(path)?;
    if table.is_empty() {
        writer.write_record(table.columns())?;
    }
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ResultsIoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum ResultsIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to encode or decode results: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Unable to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::table::{CarbonRecord, MaintenanceRecord, NitrogenRecord};

    fn results() -> SweepResults {
        let mut results = SweepResults::default();
        for (i, ammonia) in [0., 10.].into_iter().enumerate() {
            results.nitrogen.push(NitrogenRecord {
                ammonia,
                vm: 5.,
                cue: 0.4 + i as f64 * 0.01,
                gge: 0.3,
            });
        }
        results.carbon.push(CarbonRecord {
            glc: 10.,
            vm: 0.,
            cue: 0.5,
            gge: 0.5,
        });
        results.maintenance.push(MaintenanceRecord {
            vm: 20.,
            cue: 0.45,
            gge: 0.44,
        });
        results
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecoli_full_model").join("basic_fba").join("results.bin");
        write_results(&path, &results()).unwrap();
        let read = read_results(&path).unwrap();
        assert_eq!(read, results());
    }

    #[test]
    fn overwrite_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.bin");
        write_results(&path, &results()).unwrap();
        write_results(&path, &SweepResults::default()).unwrap();
        let read = read_results(&path).unwrap();
        assert!(read.nitrogen.is_empty());
        assert!(read.carbon.is_empty());
        assert!(read.maintenance.is_empty());
    }

    #[test]
    fn nan_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.bin");
        let mut results = SweepResults::default();
        results.maintenance.push(MaintenanceRecord {
            vm: 500.,
            cue: f64::NAN,
            gge: f64::NAN,
        });
        write_results(&path, &results).unwrap();
        let read = read_results(&path).unwrap();
        assert!(read.maintenance.records()[0].cue.is_nan());
        assert!((read.maintenance.records()[0].vm - 500.).abs() < 1e-25);
    }

    #[test]
    fn read_missing_file() {
        let err = read_results("/nonexistent/results.bin").unwrap_err();
        assert!(matches!(err, ResultsIoError::Io(_)));
    }

    #[test]
    fn csv_tables() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_tables(dir.path(), &results()).unwrap();
        let nitrogen = std::fs::read_to_string(dir.path().join("nitrogen.csv")).unwrap();
        let mut lines = nitrogen.lines();
        assert_eq!(lines.next(), Some("ammonia,vm,cue,gge"));
        assert_eq!(lines.next(), Some("0.0,5.0,0.4,0.3"));
        assert_eq!(nitrogen.lines().count(), 3);
        let carbon = std::fs::read_to_string(dir.path().join("carbon.csv")).unwrap();
        assert!(carbon.starts_with("glc,vm,cue,gge"));
        let maintenance = std::fs::read_to_string(dir.path().join("maintenance.csv")).unwrap();
        assert!(maintenance.starts_with("vm,cue,gge"));
    }

    #[test]
    fn csv_empty_table_has_header() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_tables(dir.path(), &SweepResults::default()).unwrap();
        let maintenance = std::fs::read_to_string(dir.path().join("maintenance.csv")).unwrap();
        assert_eq!(maintenance.trim(), "vm,cue,gge");
    }
}
