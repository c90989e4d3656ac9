use std::fs;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use crate::error::SnapshotError;
use crate::metrics::percent_change;
use crate::models::{InstrumentRow, SnapshotFile};

pub const NAME_COLUMN: &str = "FinInstrmNm";
pub const OPEN_COLUMN: &str = "OpnPric";
pub const CLOSE_COLUMN: &str = "ClsPric";
pub const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, OPEN_COLUMN, CLOSE_COLUMN];

/// A Bhav Copy loaded into memory as headers plus raw string records.
#[derive(Debug, Clone)]
pub struct BhavCopy {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl BhavCopy {
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        if !path.is_file() {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        let file = fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> Vec<&str> {
        self.headers.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` rows, each padded or cut to the header width.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        let width = self.headers.len();
        self.records
            .iter()
            .take(n)
            .map(|record| {
                (0..width)
                    .map(|i| record.get(i).unwrap_or("").to_string())
                    .collect()
            })
            .collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect()
    }

    pub fn has_required_columns(&self) -> bool {
        self.missing_columns().is_empty()
    }

    fn required_indices(&self) -> Result<(usize, usize, usize), SnapshotError> {
        match (
            self.column_index(NAME_COLUMN),
            self.column_index(OPEN_COLUMN),
            self.column_index(CLOSE_COLUMN),
        ) {
            (Some(name), Some(open), Some(close)) => Ok((name, open, close)),
            _ => Err(SnapshotError::MissingColumns(self.missing_columns())),
        }
    }

    /// Unique instrument names in file order.
    pub fn instruments(&self) -> Result<Vec<String>, SnapshotError> {
        let (name_idx, _, _) = self.required_indices()?;
        let mut seen = std::collections::HashSet::new();
        let names = self
            .records
            .iter()
            .filter_map(|r| r.get(name_idx))
            .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    /// First row whose instrument name equals `name`.
    pub fn find(&self, name: &str) -> Result<InstrumentRow, SnapshotError> {
        let (name_idx, open_idx, close_idx) = self.required_indices()?;

        let record = self
            .records
            .iter()
            .find(|r| r.get(name_idx) == Some(name))
            .ok_or_else(|| SnapshotError::InstrumentNotFound(name.to_string()))?;

        let price = |idx: usize, column: &str| -> Result<f64, SnapshotError> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SnapshotError::InvalidPrice {
                    instrument: name.to_string(),
                    column: column.to_string(),
                    value: raw.to_string(),
                })
        };

        Ok(InstrumentRow {
            name: name.to_string(),
            open: price(open_idx, OPEN_COLUMN)?,
            close: price(close_idx, CLOSE_COLUMN)?,
        })
    }
}

impl InstrumentRow {
    pub fn change_percent(&self) -> Result<f64, crate::error::MetricError> {
        percent_change(self.open, self.close)
    }
}

/// Dated snapshots under `dir`, newest first. A missing directory is empty.
pub fn list_snapshots(dir: &Path) -> Result<Vec<SnapshotFile>, SnapshotError> {
    if !dir.is_dir() {
        debug!("Snapshot directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            if let Some(snapshot) = SnapshotFile::from_path(&path) {
                snapshots.push(snapshot);
            }
        }
    }
    snapshots.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(snapshots)
}

pub fn latest_snapshot(dir: &Path) -> Result<Option<SnapshotFile>, SnapshotError> {
    Ok(list_snapshots(dir)?.into_iter().next())
}
