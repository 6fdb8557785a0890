use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".studylock";

/// Get the data directory - checks for local .studylock first, then falls back to global ~/.studylock
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .studylock directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Resolve the data directory (explicit override wins) and make sure it exists
pub fn ensure_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => get_data_dir()?,
    };
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .studylock directory in the current directory
pub fn init_local_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let data_dir = current_dir.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

pub fn tasks_file(data_dir: &Path) -> PathBuf {
    data_dir.join("tasks.json")
}

pub fn mistakes_file(data_dir: &Path) -> PathBuf {
    data_dir.join("mistakes.json")
}

pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join("config.json")
}

pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join("studylock.log")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
