//! Process-local [`TeamStore`] used when no MongoDB URI is configured.

use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TeamStore, same_member_set};
use crate::dao::{
    models::{ReplaceOutcome, TeamEntity, UpsertOutcome},
    storage::{StorageError, StorageResult},
};

/// In-memory team collection mirroring the MongoDB unique member index.
#[derive(Clone, Default)]
pub struct MemoryTeamStore {
    teams: Arc<RwLock<Vec<TeamEntity>>>,
}

impl MemoryTeamStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `teams`.
    pub fn with_teams(teams: Vec<TeamEntity>) -> StorageResult<Self> {
        ensure_disjoint(&[], &teams)?;
        Ok(Self {
            teams: Arc::new(RwLock::new(teams)),
        })
    }

    async fn find_by_member(&self, roll_no: String) -> Option<TeamEntity> {
        let guard = self.teams.read().await;
        guard.iter().find(|team| team.has_member(&roll_no)).cloned()
    }

    async fn find_by_any_member(&self, members: Vec<String>) -> Option<TeamEntity> {
        let guard = self.teams.read().await;
        guard
            .iter()
            .find(|team| members.iter().any(|member| team.has_member(member)))
            .cloned()
    }

    async fn insert_team(&self, team: TeamEntity) -> StorageResult<()> {
        let mut guard = self.teams.write().await;
        ensure_disjoint(&guard, std::slice::from_ref(&team))?;
        guard.push(team);
        Ok(())
    }

    async fn adjust_score(&self, id: Uuid, delta: i64, ceiling: Option<i64>) -> Option<TeamEntity> {
        let mut guard = self.teams.write().await;
        let team = guard.iter_mut().find(|team| team.id == id)?;
        let next = team.score.checked_add(delta)?;
        if ceiling.is_some_and(|ceiling| next > ceiling) {
            return None;
        }
        team.score = next;
        team.updated_at = SystemTime::now();
        Some(team.clone())
    }

    async fn replace_all(&self, teams: Vec<TeamEntity>) -> StorageResult<ReplaceOutcome> {
        ensure_disjoint(&[], &teams)?;
        let mut guard = self.teams.write().await;
        let removed = guard.len() as u64;
        let inserted = teams.len() as u64;
        *guard = teams;
        Ok(ReplaceOutcome { removed, inserted })
    }

    async fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> StorageResult<UpsertOutcome> {
        let mut guard = self.teams.write().await;
        if let Some(team) = guard
            .iter_mut()
            .find(|team| same_member_set(&team.members, &members))
        {
            if team.score == score {
                return Ok(UpsertOutcome::Unchanged);
            }
            team.score = score;
            team.updated_at = SystemTime::now();
            return Ok(UpsertOutcome::Updated);
        }

        let team = TeamEntity::new(members, score);
        ensure_disjoint(&guard, std::slice::from_ref(&team))?;
        guard.push(team);
        Ok(UpsertOutcome::Inserted)
    }
}

/// Reject `incoming` teams sharing a roll number with `existing` or with each other.
fn ensure_disjoint(existing: &[TeamEntity], incoming: &[TeamEntity]) -> StorageResult<()> {
    for (index, team) in incoming.iter().enumerate() {
        let others = existing.iter().chain(&incoming[..index]);
        for other in others {
            if let Some(member) = team.members.iter().find(|member| other.has_member(member)) {
                return Err(StorageError::conflict(format!(
                    "roll number `{member}` already belongs to team `{}`",
                    other.id
                )));
            }
        }
    }
    Ok(())
}

impl TeamStore for MemoryTeamStore {
    fn find_by_member(
        &self,
        roll_no: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.find_by_member(roll_no).await) })
    }

    fn find_by_any_member(
        &self,
        members: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.find_by_any_member(members).await) })
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await })
    }

    fn adjust_score(
        &self,
        id: Uuid,
        delta: i64,
        ceiling: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.adjust_score(id, delta, ceiling).await) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.teams.read().await.clone()) })
    }

    fn replace_all(
        &self,
        teams: Vec<TeamEntity>,
    ) -> BoxFuture<'static, StorageResult<ReplaceOutcome>> {
        let store = self.clone();
        Box::pin(async move { store.replace_all(teams).await })
    }

    fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_by_members(members, score).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(members: &[&str], score: i64) -> TeamEntity {
        TeamEntity::new(members.iter().map(|m| m.to_string()).collect(), score)
    }

    #[tokio::test]
    async fn insert_rejects_shared_member() {
        let store = MemoryTeamStore::new();
        store.insert_team(team(&["A1", "B2"], 0)).await.unwrap();

        let err = store.insert_team(team(&["B2"], 0)).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.teams.read().await.len(), 1);
    }

    #[tokio::test]
    async fn adjust_score_respects_ceiling() {
        let store = MemoryTeamStore::new();
        let created = team(&["A1"], 230);
        let id = created.id;
        store.insert_team(created).await.unwrap();

        assert!(store.adjust_score(id, 11, Some(240)).await.is_none());
        let updated = store.adjust_score(id, 10, Some(240)).await.unwrap();
        assert_eq!(updated.score, 240);
        let lowered = store.adjust_score(id, -300, None).await.unwrap();
        assert_eq!(lowered.score, -60);
    }

    #[tokio::test]
    async fn upsert_matches_exact_member_set_only() {
        let store = MemoryTeamStore::new();
        store.insert_team(team(&["A1", "B2"], 5)).await.unwrap();

        let members = vec!["B2".to_string(), "A1".to_string()];
        assert_eq!(
            store.upsert_by_members(members.clone(), 5).await.unwrap(),
            UpsertOutcome::Unchanged
        );
        assert_eq!(
            store.upsert_by_members(members, 9).await.unwrap(),
            UpsertOutcome::Updated
        );
        assert_eq!(
            store
                .upsert_by_members(vec!["C3".to_string()], 0)
                .await
                .unwrap(),
            UpsertOutcome::Inserted
        );
        let err = store
            .upsert_by_members(vec!["A1".to_string()], 0)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn replace_all_swaps_contents() {
        let store = MemoryTeamStore::with_teams(vec![team(&["A1"], 3), team(&["B2"], 4)]).unwrap();

        let outcome = store.replace_all(vec![team(&["C3"], 0)]).await.unwrap();
        assert_eq!(
            outcome,
            ReplaceOutcome {
                removed: 2,
                inserted: 1
            }
        );
        assert!(store.find_by_member("A1".into()).await.is_none());
        assert!(store.find_by_member("C3".into()).await.is_some());
    }

    #[tokio::test]
    async fn upsert_touches_updated_at_only_on_change() {
        let mut stale = team(&["A1", "B2"], 5);
        stale.updated_at = SystemTime::UNIX_EPOCH;
        let store = MemoryTeamStore::with_teams(vec![stale]).unwrap();
        let members = vec!["A1".to_string(), "B2".to_string()];

        store.upsert_by_members(members.clone(), 5).await.unwrap();
        let unchanged = store.find_by_member("A1".into()).await.unwrap();
        assert_eq!(unchanged.updated_at, SystemTime::UNIX_EPOCH);

        store.upsert_by_members(members, 9).await.unwrap();
        let updated = store.find_by_member("A1".into()).await.unwrap();
        assert_eq!(updated.score, 9);
        assert!(updated.updated_at > SystemTime::UNIX_EPOCH);
    }
}
