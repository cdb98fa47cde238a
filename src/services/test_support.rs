//! Store double that lets another writer get in between a read and a write.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{ReplaceOutcome, TeamEntity, UpsertOutcome},
    storage::StorageResult,
    team_store::{TeamStore, memory::MemoryTeamStore},
};

/// Wraps a [`MemoryTeamStore`] and injects concurrent writes.
#[derive(Clone, Default)]
pub(crate) struct InterleavedStore {
    inner: MemoryTeamStore,
    /// Inserted by the first lookup, which then reports nothing found.
    rival: Arc<Mutex<Option<TeamEntity>>>,
    /// Score written by another party right before every score update, which is then refused.
    moved_score: Option<i64>,
}

impl InterleavedStore {
    /// The first lookup loses a registration race against `rival`.
    pub(crate) fn with_rival(rival: TeamEntity) -> Self {
        Self {
            rival: Arc::new(Mutex::new(Some(rival))),
            ..Self::default()
        }
    }

    /// Score updates on `teams` find the score already moved to `moved_score`.
    pub(crate) fn with_moved_score(teams: Vec<TeamEntity>, moved_score: i64) -> Self {
        Self {
            inner: MemoryTeamStore::with_teams(teams).unwrap(),
            moved_score: Some(moved_score),
            ..Self::default()
        }
    }

    fn lookup(
        &self,
        lookup: BoxFuture<'static, StorageResult<Option<TeamEntity>>>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        match self.rival.lock().unwrap().take() {
            Some(rival) => {
                let insert = TeamStore::insert_team(&self.inner, rival);
                Box::pin(async move {
                    insert.await?;
                    Ok(None)
                })
            }
            None => lookup,
        }
    }
}

impl TeamStore for InterleavedStore {
    fn find_by_member(
        &self,
        roll_no: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        self.lookup(TeamStore::find_by_member(&self.inner, roll_no))
    }

    fn find_by_any_member(
        &self,
        members: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        self.lookup(TeamStore::find_by_any_member(&self.inner, members))
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        TeamStore::insert_team(&self.inner, team)
    }

    fn adjust_score(
        &self,
        id: Uuid,
        delta: i64,
        ceiling: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let Some(moved_score) = self.moved_score else {
            return TeamStore::adjust_score(&self.inner, id, delta, ceiling);
        };
        let inner = self.inner.clone();
        Box::pin(async move {
            let teams = TeamStore::list_teams(&inner).await?;
            if let Some(team) = teams.iter().find(|team| team.id == id) {
                TeamStore::adjust_score(&inner, id, moved_score - team.score, None).await?;
            }
            Ok(None)
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        TeamStore::list_teams(&self.inner)
    }

    fn replace_all(
        &self,
        teams: Vec<TeamEntity>,
    ) -> BoxFuture<'static, StorageResult<ReplaceOutcome>> {
        TeamStore::replace_all(&self.inner, teams)
    }

    fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>> {
        TeamStore::upsert_by_members(&self.inner, members, score)
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        TeamStore::health_check(&self.inner)
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        TeamStore::try_reconnect(&self.inner)
    }
}
