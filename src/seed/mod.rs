//! # Seeding
//!
//! Imports `bootcamps.json` and `courses.json` from a directory through the
//! regular create pipeline, so seeded data is validated, geocoded and
//! aggregated exactly like API traffic. Identities in the files are kept,
//! which lets courses reference their bootcamp.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::http_server::AppState;
use crate::models::course::BOOTCAMP_FIELD;
use crate::rest_api::ApiError;
use crate::store::DocumentId;

pub const BOOTCAMPS_FILE: &str = "bootcamps.json";
pub const COURSES_FILE: &str = "courses.json";

/// Seeding errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("{path} is not a JSON array of objects: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{file} entry {index}: {reason}")]
    Entry {
        file: &'static str,
        index: usize,
        reason: String,
    },

    #[error("{file} entry {index}: {source}")]
    Import {
        file: &'static str,
        index: usize,
        #[source]
        source: ApiError,
    },
}

/// Parsed seed files
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub bootcamps: Vec<Value>,
    pub courses: Vec<Value>,
}

/// What an import created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub bootcamps: usize,
    pub courses: usize,
}

impl SeedData {
    /// Read the seed files in `dir`; `courses.json` is optional
    pub async fn load(dir: &Path) -> Result<Self, SeedError> {
        let bootcamps = read_array(&dir.join(BOOTCAMPS_FILE)).await?;
        let courses_path = dir.join(COURSES_FILE);
        let courses = if tokio::fs::try_exists(&courses_path).await.unwrap_or(false) {
            read_array(&courses_path).await?
        } else {
            Vec::new()
        };
        Ok(Self { bootcamps, courses })
    }
}

async fn read_array(path: &Path) -> Result<Vec<Value>, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let entries: Vec<Value> = serde_json::from_str(&raw).map_err(|e| SeedError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if entries.iter().any(|entry| !entry.is_object()) {
        return Err(SeedError::Parse {
            path: path.to_path_buf(),
            reason: "every entry must be an object".to_string(),
        });
    }
    Ok(entries)
}

/// Import bootcamps first, then courses
pub async fn import(state: &AppState, data: SeedData) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for (index, mut entry) in data.bootcamps.into_iter().enumerate() {
        let id = take_id(&mut entry, BOOTCAMPS_FILE, index)?;
        state
            .bootcamps
            .import(id, entry)
            .await
            .map_err(|source| SeedError::Import {
                file: BOOTCAMPS_FILE,
                index,
                source,
            })?;
        report.bootcamps += 1;
    }

    for (index, mut entry) in data.courses.into_iter().enumerate() {
        let id = take_id(&mut entry, COURSES_FILE, index)?;
        let bootcamp = entry
            .get(BOOTCAMP_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SeedError::Entry {
                file: COURSES_FILE,
                index,
                reason: format!("missing '{}' reference", BOOTCAMP_FIELD),
            })?;
        state
            .courses
            .import(&bootcamp, id, entry)
            .await
            .map_err(|source| SeedError::Import {
                file: COURSES_FILE,
                index,
                source,
            })?;
        report.courses += 1;
    }

    info!(
        bootcamps = report.bootcamps,
        courses = report.courses,
        "seed data imported"
    );
    Ok(report)
}

/// Remove and parse the entry's `id` (or `_id`)
fn take_id(
    entry: &mut Value,
    file: &'static str,
    index: usize,
) -> Result<Option<DocumentId>, SeedError> {
    let Some(object) = entry.as_object_mut() else {
        return Ok(None);
    };
    let raw = object.remove("id").or_else(|| object.remove("_id"));
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => DocumentId::parse(&raw).map(Some).ok_or_else(|| {
            SeedError::Entry {
                file,
                index,
                reason: format!("malformed id '{}'", raw),
            }
        }),
        Some(other) => Err(SeedError::Entry {
            file,
            index,
            reason: format!("malformed id {}", other),
        }),
    }
}
