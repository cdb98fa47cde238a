//! Offline team import: spreadsheet rows to a JSON snapshot, optionally seeded into the store.

use std::path::PathBuf;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{dao::storage::StorageError, roll_no};

pub mod seed;
pub mod snapshot;
#[cfg(feature = "teams-import")]
pub mod spreadsheet;

pub use snapshot::SnapshotTeam;

/// Failures raised while importing or seeding teams.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The workbook path does not exist.
    #[error("workbook not found: {path}")]
    WorkbookNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The workbook exists but could not be parsed.
    #[cfg(feature = "teams-import")]
    #[error("failed to open workbook {path}")]
    OpenWorkbook {
        /// Path of the workbook.
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    /// The workbook contains no worksheet.
    #[error("workbook {path} has no worksheet")]
    NoWorksheet {
        /// Path of the workbook.
        path: PathBuf,
    },
    /// The snapshot could not be written.
    #[error("failed to write snapshot {path}")]
    WriteSnapshot {
        /// Destination path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The snapshot could not be encoded as JSON.
    #[error("failed to encode snapshot")]
    EncodeSnapshot(#[source] serde_json::Error),
    /// A roll number appears in more than one snapshot team.
    #[error("roll number {roll_no} appears in more than one team")]
    OverlappingMembers {
        /// Offending normalized roll number.
        roll_no: String,
    },
    /// The team store rejected or failed a seeding write.
    #[error("team store failure while seeding")]
    Storage(#[from] StorageError),
}

/// Turn spreadsheet rows into candidate teams, one per non-empty row.
pub fn rows_to_teams(rows: Vec<Vec<String>>) -> Vec<SnapshotTeam> {
    rows.into_iter()
        .map(|row| roll_no::canonical_members(row))
        .filter(|members| !members.is_empty())
        .map(|members| SnapshotTeam { members, score: 0 })
        .collect()
}

/// Merge imported teams into an existing snapshot, keyed by member set.
///
/// Existing entries keep their position; an imported team with the same member
/// set overwrites the score, new member sets are appended.
pub fn merge_snapshot(existing: Vec<SnapshotTeam>, imported: Vec<SnapshotTeam>) -> Vec<SnapshotTeam> {
    let mut merged: IndexMap<String, SnapshotTeam> = IndexMap::new();

    for team in existing.into_iter().chain(imported) {
        let members = roll_no::canonical_members(&team.members);
        if members.is_empty() {
            continue;
        }
        let key = roll_no::membership_key(&members);
        merged.insert(
            key,
            SnapshotTeam {
                members,
                score: team.score,
            },
        );
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn team(members: &[&str], score: i64) -> SnapshotTeam {
        SnapshotTeam {
            members: row(members),
            score,
        }
    }

    #[test]
    fn rows_skip_blank_cells_and_rows() {
        let teams = rows_to_teams(vec![
            row(&[" b2 ", "", "a1"]),
            row(&["", "  "]),
            row(&[]),
            row(&["c3"]),
        ]);
        assert_eq!(teams, vec![team(&["A1", "B2"], 0), team(&["C3"], 0)]);
    }

    #[test]
    fn merge_keeps_existing_order_and_overwrites_scores() {
        let existing = vec![team(&["A1", "B2"], 50), team(&["C3"], 20)];
        let imported = vec![team(&["d4"], 0), team(&["b2", "a1"], 0)];

        let merged = merge_snapshot(existing, imported);
        assert_eq!(
            merged,
            vec![team(&["A1", "B2"], 0), team(&["C3"], 20), team(&["D4"], 0)]
        );
    }

    #[test]
    fn importing_twice_is_idempotent() {
        let rows = vec![row(&["a1", "b2"]), row(&["c3"])];

        let once = merge_snapshot(Vec::new(), rows_to_teams(rows.clone()));
        let twice = merge_snapshot(once.clone(), rows_to_teams(rows));
        assert_eq!(once, twice);
    }
}
