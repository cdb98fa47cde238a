pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{ReplaceOutcome, TeamEntity, UpsertOutcome};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for teams.
///
/// Implementations must reject any write that would place a roll number in
/// two teams with [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict).
pub trait TeamStore: Send + Sync {
    /// Find the team whose members contain `roll_no`.
    fn find_by_member(&self, roll_no: String)
    -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Find a team sharing at least one member with `members`.
    fn find_by_any_member(
        &self,
        members: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Persist a new team.
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Add `delta` to the team score.
    ///
    /// When `ceiling` is set the update only happens if the resulting score
    /// stays at or below it; `None` is returned when the team is missing or
    /// the guard rejected the update.
    fn adjust_score(
        &self,
        id: Uuid,
        delta: i64,
        ceiling: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Return every stored team.
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Delete every team, then insert `teams`.
    fn replace_all(&self, teams: Vec<TeamEntity>)
    -> BoxFuture<'static, StorageResult<ReplaceOutcome>>;
    /// Set the score of the team whose member set is exactly `members`, creating it if needed.
    fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Whether two member lists describe the same set.
pub(crate) fn same_member_set(left: &[String], right: &[String]) -> bool {
    left.len() == right.len() && left.iter().all(|member| right.contains(member))
}
