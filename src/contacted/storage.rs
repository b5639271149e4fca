use super::types::ContactedState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default ledger path (~/.config/leadrank/contacted.json)
pub fn get_contacted_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("contacted.json"))
}

/// Load the contacted ledger from a JSON file
///
/// If the file doesn't exist, returns a new empty ledger.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_contacted_state(path: &Path) -> Result<ContactedState> {
    if !path.exists() {
        return Ok(ContactedState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open contacted ledger at {}", path.display()))?;

    let state: ContactedState =
        serde_json::from_reader(file).context("Failed to load contacted ledger")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported contacted ledger version: {}", state.version);
    }

    Ok(state)
}

/// Save the contacted ledger atomically, creating the parent directory if needed
pub fn save_contacted_state(path: &Path, state: &ContactedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state)
        .context("Failed to serialize contacted ledger")?;

    file.commit().context("Failed to save contacted ledger")?;

    Ok(())
}
