//! JSON persistence for workspaces: canonical names, atomic writes,
//! and timestamped backups of overwritten files.

use chrono::Utc;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::store::Store;
use crate::utils::paths::{self, ensure_dir};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("workspace `{0}` not found")]
    Missing(String),
}

/// Abstraction over persistence backends capable of storing workspaces.
pub trait StorageBackend: Send + Sync {
    fn save(&self, store: &Store, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Store>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct JsonStorage {
    workspaces_dir: PathBuf,
    backups_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(paths::app_data_dir);
        ensure_dir(&base)?;
        let workspaces_dir = paths::workspaces_dir_in(&base);
        let backups_dir = paths::backups_dir_in(&base);
        ensure_dir(&workspaces_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            workspaces_dir,
            backups_dir,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn workspace_path(&self, name: &str) -> PathBuf {
        self.workspaces_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        fs::copy(path, dir.join(backup_name))?;
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, store: &Store, name: &str) -> Result<()> {
        let path = self.workspace_path(name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let json = serde_json::to_string_pretty(store)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!("workspace `{}` saved to {}", name, path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Store> {
        let path = self.workspace_path(name);
        if !path.exists() {
            return Err(StorageError::Missing(name.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        let store: Store = serde_json::from_str(&data)?;
        Ok(store)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

pub(crate) fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "workspace".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
