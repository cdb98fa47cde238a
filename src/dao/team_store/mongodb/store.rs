use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, doc},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoTeamDocument, doc_id, exact_members_filter, uuid_as_binary},
};
use crate::dao::{
    models::{ReplaceOutcome, TeamEntity, UpsertOutcome},
    storage::StorageResult,
    team_store::TeamStore,
};

const TEAM_COLLECTION_NAME: &str = "teams";
const MEMBERS_INDEX_NAME: &str = "team_members_unique_idx";

/// MongoDB-backed [`TeamStore`] implementation.
#[derive(Clone)]
pub struct MongoTeamStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoTeamStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        info!(
            database = %store.inner.config.database_name,
            "MongoDB team store ready"
        );
        Ok(store)
    }

    /// A multikey unique index on `members` keeps a roll number in at most one team.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"members": 1})
            .options(
                IndexOptions::builder()
                    .name(Some(MEMBERS_INDEX_NAME.to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TEAM_COLLECTION_NAME,
                index: "members",
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoTeamDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn find_by_member(&self, roll_no: String) -> MongoResult<Option<TeamEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc! {"members": roll_no.as_str()})
            .await
            .map_err(|source| MongoDaoError::FindTeam {
                roll_nos: vec![roll_no],
                source,
            })?;

        Ok(document.map(Into::into))
    }

    async fn find_by_any_member(&self, members: Vec<String>) -> MongoResult<Option<TeamEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc! {"members": {"$in": members.clone()}})
            .await
            .map_err(|source| MongoDaoError::FindTeam {
                roll_nos: members,
                source,
            })?;

        Ok(document.map(Into::into))
    }

    async fn insert_team(&self, team: TeamEntity) -> MongoResult<()> {
        let id = team.id;
        let document: MongoTeamDocument = team.into();
        let collection = self.collection().await;

        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertTeam { id, source })?;

        Ok(())
    }

    async fn adjust_score(
        &self,
        id: Uuid,
        delta: i64,
        ceiling: Option<i64>,
    ) -> MongoResult<Option<TeamEntity>> {
        let collection = self.collection().await;

        let mut filter = doc_id(id);
        if let Some(ceiling) = ceiling {
            filter.insert("score", doc! {"$lte": ceiling.saturating_sub(delta)});
        }

        let document = collection
            .find_one_and_update(
                filter,
                doc! {
                    "$inc": {"score": delta},
                    "$set": {"updated_at": DateTime::now()},
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpdateScore { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoTeamDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn replace_all(&self, teams: Vec<TeamEntity>) -> MongoResult<ReplaceOutcome> {
        let collection = self.collection().await;

        let deleted = collection
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::ReplaceTeams { source })?;

        let documents: Vec<MongoTeamDocument> = teams.into_iter().map(Into::into).collect();
        let inserted = if documents.is_empty() {
            0
        } else {
            collection
                .insert_many(&documents)
                .await
                .map_err(|source| MongoDaoError::ReplaceTeams { source })?
                .inserted_ids
                .len() as u64
        };

        Ok(ReplaceOutcome {
            removed: deleted.deleted_count,
            inserted,
        })
    }

    async fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> MongoResult<UpsertOutcome> {
        let collection = self.collection().await;
        let filter = exact_members_filter(&members);

        let existing = collection
            .find_one(filter.clone())
            .await
            .map_err(|source| MongoDaoError::UpsertTeam {
                members: members.clone(),
                source,
            })?;
        if existing.is_some_and(|document| document.score() == score) {
            return Ok(UpsertOutcome::Unchanged);
        }

        let result = collection
            .update_one(
                filter,
                doc! {
                    "$set": {
                        "members": members.clone(),
                        "score": score,
                        "updated_at": DateTime::now(),
                    },
                    "$setOnInsert": {"_id": uuid_as_binary(Uuid::new_v4())},
                },
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::UpsertTeam { members, source })?;

        Ok(if result.upserted_id.is_some() {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}

impl TeamStore for MongoTeamStore {
    fn find_by_member(
        &self,
        roll_no: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_by_member(roll_no).await.map_err(Into::into) })
    }

    fn find_by_any_member(
        &self,
        members: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_by_any_member(members).await.map_err(Into::into) })
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await.map_err(Into::into) })
    }

    fn adjust_score(
        &self,
        id: Uuid,
        delta: i64,
        ceiling: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .adjust_score(id, delta, ceiling)
                .await
                .map_err(Into::into)
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn replace_all(
        &self,
        teams: Vec<TeamEntity>,
    ) -> BoxFuture<'static, StorageResult<ReplaceOutcome>> {
        let store = self.clone();
        Box::pin(async move { store.replace_all(teams).await.map_err(Into::into) })
    }

    fn upsert_by_members(
        &self,
        members: Vec<String>,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert_by_members(members, score)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
