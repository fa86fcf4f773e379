//! Run inputs: concept labels, translated query words and target regions

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::consts::DEFAULT_REGIONS;
use crate::core::Concept;
use crate::error::AppError;

fn read_lines(path: &Path) -> Result<Option<Vec<String>>, AppError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AppError::ReadInput {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// One label per line; the file must exist. Repeated labels keep their
/// first position.
pub(crate) fn load_concepts(path: &Path) -> Result<Vec<String>, AppError> {
    let lines = read_lines(path)?.ok_or_else(|| AppError::ReadInput {
        path: path.to_path_buf(),
        source: std::io::Error::from(ErrorKind::NotFound),
    })?;
    let mut labels: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if labels.contains(&line) {
            warn!("Duplicate concept {line:?} in {}", path.display());
        } else {
            labels.push(line);
        }
    }
    Ok(labels)
}

/// JSON object of label -> query words. A missing file means every concept
/// is searched by its own label.
pub(crate) fn load_query_words(path: &Path) -> Result<HashMap<String, Vec<String>>, AppError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found, searching concepts by label", path.display());
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(AppError::ReadInput {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content).map_err(|source| AppError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_region(raw: &str) -> Option<String> {
    let code = raw.trim();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// ISO 3166-1 alpha-2 codes, one per line. Falls back to the built-in list
/// when the file is missing.
pub(crate) fn load_regions(path: &Path, limit: Option<usize>) -> Result<Vec<String>, AppError> {
    let raw = match read_lines(path)? {
        Some(lines) => lines,
        None => {
            warn!("Regions file {} not found. Using default subset.", path.display());
            DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
        }
    };

    let mut regions: Vec<String> = Vec::with_capacity(raw.len());
    for line in raw {
        match normalize_region(&line) {
            Some(code) if !regions.contains(&code) => regions.push(code),
            Some(_) => {}
            None => warn!("Skipping invalid region code {line:?}"),
        }
    }

    if let Some(n) = limit.filter(|n| *n > 0) {
        regions.truncate(n);
    }
    if regions.is_empty() {
        warn!("No valid region codes in {}; concepts will not be collected", path.display());
    }
    Ok(regions)
}

/// Concepts in the day's rotation slot.
///
/// With `rotation_slots` N > 1 the list is cut into N chunks of
/// `max(1, len / N)` labels and the chunk at `day_ordinal % N` is chosen;
/// the last chunk also takes the remainder.
pub(crate) fn select_concepts(
    all: &[String],
    rotation_slots: u32,
    as_of: NaiveDate,
) -> Vec<String> {
    if rotation_slots <= 1 || all.is_empty() {
        return all.to_vec();
    }

    let slots = rotation_slots as usize;
    let slot = (as_of.num_days_from_ce().unsigned_abs() as usize) % slots;
    let chunk_size = (all.len() / slots).max(1);
    let start = slot * chunk_size;
    if start >= all.len() {
        return Vec::new();
    }
    let end = if slot + 1 == slots {
        all.len()
    } else {
        (start + chunk_size).min(all.len())
    };
    all[start..end].to_vec()
}

pub(crate) fn build_concepts(
    labels: &[String],
    query_words: &HashMap<String, Vec<String>>,
    regions: &[String],
) -> Vec<Concept> {
    labels
        .iter()
        .map(|label| {
            let queries = match query_words.get(label) {
                Some(words) if !words.is_empty() => words.clone(),
                _ => vec![label.clone()],
            };
            Concept::new(label.clone(), queries, regions.to_vec())
        })
        .collect()
}
