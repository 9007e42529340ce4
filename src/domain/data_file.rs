//! Per-account data files
//!
//! Each account persists a small JSON document holding its group memberships
//! and settings. The console reads these at startup to rebuild the account
//! directory and writes them back whenever a command changes them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted state of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Path of the data file for `account` under `data_dir`.
pub fn account_file(data_dir: &Path, account: &str) -> PathBuf {
    data_dir.join(format!("{account}.json"))
}

pub fn load(path: &Path) -> Result<AccountData, DataFileError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| DataFileError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(path: &Path, data: &AccountData) -> Result<(), DataFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(data).expect("account data serializes");
    fs::write(path, content)?;
    Ok(())
}

/// Scan `data_dir` for account files, returning `(name, data)` pairs sorted
/// by account name so the directory order is stable across restarts.
pub fn scan(data_dir: &Path) -> Result<Vec<(String, AccountData)>, DataFileError> {
    let mut result = Vec::new();
    if !data_dir.exists() {
        return Ok(result);
    }
    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        result.push((name.to_string(), load(&path)?));
    }
    result.sort_by(|left, right| left.0.cmp(&right.0));
    Ok(result)
}
