use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".billing_core";
const WORKSPACE_DIR: &str = "workspaces";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.billing_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BILLING_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding managed workspace files under the given base.
pub fn workspaces_dir_in(base: &Path) -> PathBuf {
    base.join(WORKSPACE_DIR)
}

/// Base directory for backup snapshots under the given base.
pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

/// Path to the configuration file under the given base.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
