use std::path::PathBuf;

use rusqlite::{Connection, params};

use crate::core::FetchRecord;
use crate::error::PersistenceError;
use crate::utils::{format_date, parse_record_date};

use super::FetchStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS fetch_record (
    concept    TEXT PRIMARY KEY,
    last_fetch TEXT NOT NULL
)";

/// Fetch record kept in an embedded SQLite database
#[derive(Debug, Clone)]
pub(crate) struct SqliteFetchStore {
    path: PathBuf,
}

impl SqliteFetchStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> Result<Connection, PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute(SCHEMA, [])?;
        Ok(conn)
    }
}

impl FetchStore for SqliteFetchStore {
    fn load(&self) -> Result<FetchRecord, PersistenceError> {
        if !self.path.exists() {
            return Ok(FetchRecord::new());
        }
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT concept, last_fetch FROM fetch_record")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut record = FetchRecord::new();
        for row in rows {
            let (concept, value) = row?;
            let Some(date) = parse_record_date(&value) else {
                return Err(PersistenceError::InvalidDate { concept, value });
            };
            record.insert(concept, date);
        }
        Ok(record)
    }

    fn save(&self, record: &FetchRecord) -> Result<(), PersistenceError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM fetch_record", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO fetch_record (concept, last_fetch) VALUES (?1, ?2)")?;
            for (concept, date) in record {
                insert.execute(params![concept, format_date(*date)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
