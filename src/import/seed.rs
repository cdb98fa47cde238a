//! Seeding the team store from a snapshot.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use tracing::info;

use super::{ImportError, SnapshotTeam};
use crate::{
    dao::{
        models::{TeamEntity, UpsertOutcome},
        team_store::TeamStore,
    },
    roll_no,
};

/// How the snapshot is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "teams-import", derive(clap::ValueEnum))]
pub enum SeedMode {
    /// Delete every team, then insert the snapshot with fresh ids.
    #[default]
    Replace,
    /// Update or insert each snapshot team by exact member set; keep the rest.
    Upsert,
}

/// Score change planned for a team that already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChange {
    /// Normalized members of the team.
    pub members: Vec<String>,
    /// Score currently stored.
    pub from: i64,
    /// Score found in the snapshot.
    pub to: i64,
}

/// Difference between the stored teams and a snapshot, keyed by member set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedPlan {
    /// Snapshot teams with no stored counterpart.
    pub inserted: Vec<SnapshotTeam>,
    /// Stored teams whose score differs from the snapshot.
    pub updated: Vec<ScoreChange>,
    /// Number of teams identical in both.
    pub unchanged: usize,
    /// Stored teams absent from the snapshot; only deleted in replace mode.
    pub removed: Vec<TeamEntity>,
}

/// Counts reported once the snapshot has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Teams created.
    pub inserted: u64,
    /// Teams whose score changed.
    pub updated: u64,
    /// Teams left untouched.
    pub unchanged: u64,
    /// Teams deleted.
    pub removed: u64,
}

/// Fail when a roll number belongs to more than one snapshot team.
pub fn validate_disjoint(snapshot: &[SnapshotTeam]) -> Result<(), ImportError> {
    let mut seen = HashSet::new();
    for team in snapshot {
        for member in roll_no::canonical_members(&team.members) {
            if !seen.insert(member.clone()) {
                return Err(ImportError::OverlappingMembers { roll_no: member });
            }
        }
    }
    Ok(())
}

/// Compare the stored teams against `snapshot`.
pub fn plan(current: &[TeamEntity], snapshot: &[SnapshotTeam]) -> SeedPlan {
    let stored: HashMap<String, i64> = current
        .iter()
        .map(|team| (roll_no::membership_key(&team.members), team.score))
        .collect();

    let mut plan = SeedPlan::default();
    let mut snapshot_keys = HashSet::new();

    for team in snapshot {
        let members = roll_no::canonical_members(&team.members);
        if members.is_empty() {
            continue;
        }
        let key = roll_no::membership_key(&members);
        match stored.get(&key) {
            None => plan.inserted.push(SnapshotTeam {
                members,
                score: team.score,
            }),
            Some(&score) if score == team.score => plan.unchanged += 1,
            Some(&score) => plan.updated.push(ScoreChange {
                members,
                from: score,
                to: team.score,
            }),
        }
        snapshot_keys.insert(key);
    }

    plan.removed = current
        .iter()
        .filter(|team| !snapshot_keys.contains(&roll_no::membership_key(&team.members)))
        .cloned()
        .collect();

    plan
}

/// Write `snapshot` into `store` according to `mode`.
pub async fn apply(
    store: &dyn TeamStore,
    snapshot: &[SnapshotTeam],
    mode: SeedMode,
) -> Result<SeedReport, ImportError> {
    validate_disjoint(snapshot)?;

    let teams = snapshot
        .iter()
        .map(|team| (roll_no::canonical_members(&team.members), team.score))
        .filter(|(members, _)| !members.is_empty());

    let report = match mode {
        SeedMode::Replace => {
            let entities = teams
                .map(|(members, score)| TeamEntity::new(members, score))
                .collect();
            let outcome = store.replace_all(entities).await?;
            SeedReport {
                inserted: outcome.inserted,
                removed: outcome.removed,
                ..SeedReport::default()
            }
        }
        SeedMode::Upsert => {
            let mut report = SeedReport::default();
            for (members, score) in teams {
                match store.upsert_by_members(members, score).await? {
                    UpsertOutcome::Inserted => report.inserted += 1,
                    UpsertOutcome::Updated => report.updated += 1,
                    UpsertOutcome::Unchanged => report.unchanged += 1,
                }
            }
            report
        }
    };

    info!(
        ?mode,
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        removed = report.removed,
        "seeding complete"
    );
    Ok(report)
}

impl SeedPlan {
    /// Render the plan as it applies to `mode`.
    pub fn describe(&self, mode: SeedMode) -> PlanSummary<'_> {
        PlanSummary { plan: self, mode }
    }
}

/// Human-readable rendering of a [`SeedPlan`].
pub struct PlanSummary<'a> {
    plan: &'a SeedPlan,
    mode: SeedMode,
}

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        writeln!(
            f,
            "insert {}, update {}, unchanged {}, {} {}",
            plan.inserted.len(),
            plan.updated.len(),
            plan.unchanged,
            match self.mode {
                SeedMode::Replace => "remove",
                SeedMode::Upsert => "keep",
            },
            plan.removed.len()
        )?;
        for team in &plan.inserted {
            writeln!(f, "  + {} ({})", team.members.join(", "), team.score)?;
        }
        for change in &plan.updated {
            writeln!(
                f,
                "  ~ {} ({} -> {})",
                change.members.join(", "),
                change.from,
                change.to
            )?;
        }
        if self.mode == SeedMode::Replace {
            for team in &plan.removed {
                writeln!(f, "  - {} ({})", team.members.join(", "), team.score)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::team_store::memory::MemoryTeamStore;

    fn snapshot_team(members: &[&str], score: i64) -> SnapshotTeam {
        SnapshotTeam {
            members: members.iter().map(|m| m.to_string()).collect(),
            score,
        }
    }

    fn entity(members: &[&str], score: i64) -> TeamEntity {
        TeamEntity::new(members.iter().map(|m| m.to_string()).collect(), score)
    }

    #[test]
    fn overlapping_members_are_rejected() {
        let snapshot = vec![snapshot_team(&["A1", "B2"], 0), snapshot_team(&["b2 "], 0)];
        assert!(matches!(
            validate_disjoint(&snapshot),
            Err(ImportError::OverlappingMembers { roll_no }) if roll_no == "B2"
        ));
        assert!(validate_disjoint(&[snapshot_team(&["A1", "a1"], 0)]).is_ok());
    }

    #[test]
    fn plan_classifies_every_team() {
        let current = vec![
            entity(&["A1", "B2"], 30),
            entity(&["C3"], 5),
            entity(&["D4"], 9),
        ];
        let snapshot = vec![
            snapshot_team(&["b2", "a1"], 30),
            snapshot_team(&["C3"], 0),
            snapshot_team(&["E5"], 0),
        ];

        let plan = plan(&current, &snapshot);
        assert_eq!(plan.unchanged, 1);
        assert_eq!(
            plan.updated,
            vec![ScoreChange {
                members: vec!["C3".into()],
                from: 5,
                to: 0,
            }]
        );
        assert_eq!(plan.inserted, vec![snapshot_team(&["E5"], 0)]);
        assert_eq!(plan.removed.len(), 1);
        assert_eq!(plan.removed[0].members, vec!["D4"]);

        let summary = plan.describe(SeedMode::Replace).to_string();
        assert!(summary.starts_with("insert 1, update 1, unchanged 1, remove 1"));
        assert!(summary.contains("  - D4 (9)"));
    }

    #[tokio::test]
    async fn replace_discards_teams_missing_from_snapshot() {
        let store = MemoryTeamStore::with_teams(vec![entity(&["D4"], 9)]).unwrap();
        let snapshot = vec![snapshot_team(&["a1", "b2"], 0)];

        let report = apply(&store, &snapshot, SeedMode::Replace).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.removed, 1);

        let teams = store.list_teams().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].members, vec!["A1", "B2"]);
    }

    #[tokio::test]
    async fn upsert_keeps_other_teams_and_is_repeatable() {
        let store = MemoryTeamStore::with_teams(vec![
            entity(&["D4"], 9),
            entity(&["A1", "B2"], 40),
        ])
        .unwrap();
        let snapshot = vec![snapshot_team(&["b2", "a1"], 0), snapshot_team(&["C3"], 0)];

        let first = apply(&store, &snapshot, SeedMode::Upsert).await.unwrap();
        assert_eq!((first.inserted, first.updated, first.unchanged), (1, 1, 0));

        let second = apply(&store, &snapshot, SeedMode::Upsert).await.unwrap();
        assert_eq!((second.inserted, second.updated, second.unchanged), (0, 0, 2));

        let teams = store.list_teams().await.unwrap();
        assert_eq!(teams.len(), 3);
        assert!(teams.iter().any(|team| team.members == ["D4"] && team.score == 9));
    }

    #[tokio::test]
    async fn overlapping_snapshot_writes_nothing() {
        let store = MemoryTeamStore::new();
        let snapshot = vec![snapshot_team(&["A1"], 0), snapshot_team(&["A1", "B2"], 0)];

        let err = apply(&store, &snapshot, SeedMode::Replace).await.unwrap_err();
        assert!(matches!(err, ImportError::OverlappingMembers { .. }));
        assert!(store.list_teams().await.unwrap().is_empty());
    }
}
