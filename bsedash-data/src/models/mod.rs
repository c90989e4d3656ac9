use std::path::{Path, PathBuf};

use chrono::NaiveDate;
/// Date key format used both in the download URL and the local file name.
pub const DATE_KEY_FORMAT: &str = "%Y%m%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// A dated Bhav Copy stored on disk as `<YYYYMMDD>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

impl SnapshotFile {
    pub fn file_name(date: NaiveDate) -> String {
        format!("{}.csv", date_key(date))
    }

    pub fn in_dir(dir: &Path, date: NaiveDate) -> Self {
        Self {
            date,
            path: dir.join(Self::file_name(date)),
        }
    }

    /// Parses a `YYYYMMDD.csv` file name back into a snapshot entry.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_name()?.to_str()?.strip_suffix(".csv")?;
        if stem.len() != 8 {
            return None;
        }
        let date = NaiveDate::parse_from_str(stem, DATE_KEY_FORMAT).ok()?;
        Some(Self {
            date,
            path: path.to_path_buf(),
        })
    }

    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRow {
    pub name: String,
    pub open: f64,
    pub close: f64,
}

/// Near-real-time reading for one ticker. The provider may omit any field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveQuote {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(SnapshotFile::file_name(date), "20250704.csv");
        let snap = SnapshotFile::in_dir(Path::new("data"), date);
        assert_eq!(snap.path, Path::new("data").join("20250704.csv"));
        assert_eq!(snap.date_key(), "20250704");
    }

    #[test]
    fn from_path_rejects_non_dated_names() {
        assert!(SnapshotFile::from_path(Path::new("data/bhav_copy.CSV")).is_none());
        assert!(SnapshotFile::from_path(Path::new("data/2025074.csv")).is_none());
        assert!(SnapshotFile::from_path(Path::new("data/20251340.csv")).is_none());

        let snap = SnapshotFile::from_path(Path::new("data/20250704.csv")).unwrap();
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    }
}
