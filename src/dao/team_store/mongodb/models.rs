use mongodb::bson::{self, Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::TeamEntity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    members: Vec<String>,
    score: i64,
    updated_at: DateTime,
}

impl MongoTeamDocument {
    /// Stored score.
    pub fn score(&self) -> i64 {
        self.score
    }
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: bson::Uuid::from_bytes(value.id.into_bytes()),
            members: value.members,
            score: value.score,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: Uuid::from_bytes(value.id.bytes()),
            members: value.members,
            score: value.score,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// Filter matching a team whose member set is exactly `members`.
pub fn exact_members_filter(members: &[String]) -> Document {
    doc! {
        "$and": [
            { "members": { "$all": members.to_vec() } },
            { "$expr": { "$eq": [{ "$size": "$members" }, members.len() as i64] } },
        ]
    }
}
