//! Result tables of a sweep
use serde::{Deserialize, Serialize};

/// A row of a result table
pub trait Record {
    /// Column names, in field order
    const COLUMNS: &'static [&'static str];

    /// Values in the same order as [`Record::COLUMNS`]
    fn values(&self) -> Vec<f64>;
}

/// Outcome of one point of the nitrogen sweep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NitrogenRecord {
    pub ammonia: f64,
    pub vm: f64,
    pub cue: f64,
    pub gge: f64,
}

impl Record for NitrogenRecord {
    const COLUMNS: &'static [&'static str] = &["ammonia", "vm", "cue", "gge"];

    fn values(&self) -> Vec<f64> {
        vec![self.ammonia, self.vm, self.cue, self.gge]
    }
}

/// Outcome of one point of the carbon sweep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarbonRecord {
    pub glc: f64,
    pub vm: f64,
    pub cue: f64,
    pub gge: f64,
}

impl Record for CarbonRecord {
    const COLUMNS: &'static [&'static str] = &["glc", "vm", "cue", "gge"];

    fn values(&self) -> Vec<f64> {
        vec![self.glc, self.vm, self.cue, self.gge]
    }
}

/// Outcome of one point of the maintenance sweep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub vm: f64,
    pub cue: f64,
    pub gge: f64,
}

impl Record for MaintenanceRecord {
    const COLUMNS: &'static [&'static str] = &["vm", "cue", "gge"];

    fn values(&self) -> Vec<f64> {
        vec![self.vm, self.cue, self.gge]
    }
}

/// Records of one sweep, kept in insertion order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultTable<R> {
    records: Vec<R>,
}

impl<R> Default for ResultTable<R> {
    fn default() -> Self {
        ResultTable {
            records: Vec::new(),
        }
    }
}

impl<R: Record> ResultTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    /// All values of one column, `None` if the table has no such column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = R::COLUMNS.iter().position(|c| *c == name)?;
        Some(self.records.iter().map(|r| r.values()[idx]).collect())
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.values()).collect()
    }
}

impl<'a, R> IntoIterator for &'a ResultTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The three tables of a full run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    pub nitrogen: ResultTable<NitrogenRecord>,
    pub carbon: ResultTable<CarbonRecord>,
    pub maintenance: ResultTable<MaintenanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keeps_insertion_order() {
        let mut table = ResultTable::new();
        for vm in [10., 0., 5.] {
            table.push(MaintenanceRecord {
                vm,
                cue: 0.5,
                gge: 0.4,
            });
        }
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("vm").unwrap(), vec![10., 0., 5.]);
        assert_eq!(table.rows()[1], vec![0., 0.5, 0.4]);
    }

    #[test]
    fn columns_follow_record_kind() {
        let nitrogen: ResultTable<NitrogenRecord> = ResultTable::new();
        assert_eq!(nitrogen.columns(), &["ammonia", "vm", "cue", "gge"]);
        let carbon: ResultTable<CarbonRecord> = ResultTable::new();
        assert_eq!(carbon.columns(), &["glc", "vm", "cue", "gge"]);
        assert!(carbon.column("ammonia").is_none());
        let maintenance: ResultTable<MaintenanceRecord> = ResultTable::new();
        assert_eq!(maintenance.columns(), &["vm", "cue", "gge"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut table = ResultTable::new();
        let record = CarbonRecord {
            glc: 10.,
            vm: 0.,
            cue: 0.5,
            gge: 0.5,
        };
        table.push(record);
        table.push(record);
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| *r == record));
    }
}
