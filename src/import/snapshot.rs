//! JSON snapshot of imported teams, e.g. `data/teams.json`.

use std::{fs, io::ErrorKind, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ImportError;

/// One team as stored in the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTeam {
    /// Normalized, sorted roll numbers.
    pub members: Vec<String>,
    /// Score to seed; absent in hand-written files means zero.
    #[serde(default)]
    pub score: i64,
}

/// Read the snapshot at `path`.
///
/// A missing file is an empty snapshot. An unreadable or malformed file is
/// logged and also treated as empty, so the next write replaces it.
pub fn load(path: &Path) -> Vec<SnapshotTeam> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no existing snapshot; starting empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read snapshot; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(teams) => teams,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "invalid snapshot; starting empty");
            Vec::new()
        }
    }
}

/// Write `teams` as pretty JSON, creating parent directories as needed.
pub fn write(path: &Path, teams: &[SnapshotTeam]) -> Result<(), ImportError> {
    let write_error = |source| ImportError::WriteSnapshot {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(teams).map_err(ImportError::EncodeSnapshot)?;
    fs::write(path, json).map_err(write_error)
}
