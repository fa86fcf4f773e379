use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use crate::consts::FILE_DATE_FORMAT;
use crate::core::RegionRow;
use crate::error::OutputError;
use crate::output::format::{csv_escape, file_slug};

use super::OutputSink;

const HEADER: &str = "concept,region,view_count,like_count,comment_count,queries_ok,queries_failed";

pub(crate) fn region_rows_csv(rows: &[RegionRow]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_escape(&row.concept),
            csv_escape(&row.region),
            row.counters.view_count,
            row.counters.like_count,
            row.counters.comment_count,
            row.queries_ok,
            row.queries_failed,
        );
    }
    out
}

/// Writes one `region_counts_{concept}_{date}.csv` file per completed concept
#[derive(Debug, Clone)]
pub(crate) struct CsvSink {
    dir: PathBuf,
    date_stamp: String,
    written: Vec<PathBuf>,
    /// File path -> concept that owns it in this run
    claimed: HashMap<PathBuf, String>,
}

impl CsvSink {
    pub(crate) fn new(dir: &Path, as_of: NaiveDate) -> Self {
        Self {
            dir: dir.to_path_buf(),
            date_stamp: as_of.format(FILE_DATE_FORMAT).to_string(),
            written: Vec::new(),
            claimed: HashMap::new(),
        }
    }

    fn path_for_slug(&self, slug: &str) -> PathBuf {
        self.dir
            .join(format!("region_counts_{slug}_{}.csv", self.date_stamp))
    }

    /// Path for `concept`. Labels whose slugs collide with an earlier concept
    /// of this run get a numeric suffix instead of overwriting its file.
    fn claim_path(&mut self, concept: &str) -> PathBuf {
        let base = file_slug(concept);
        let mut path = self.path_for_slug(&base);
        let mut n = 2u32;
        while let Some(owner) = self.claimed.get(&path) {
            if owner == concept {
                return path;
            }
            path = self.path_for_slug(&format!("{base}_{n}"));
            n += 1;
        }
        if n > 2 {
            warn!(
                "Output name for '{concept}' collides with another concept, writing {}",
                path.display()
            );
        }
        self.claimed.insert(path.clone(), concept.to_string());
        path
    }

    pub(crate) fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for CsvSink {
    fn write_concept(&mut self, concept: &str, rows: &[RegionRow]) -> Result<(), OutputError> {
        let path = self.claim_path(concept);
        let write_err = |source| OutputError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        fs::write(&path, region_rows_csv(rows)).map_err(write_err)?;
        self.written.push(path);
        Ok(())
    }
}
