use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Normalized roll numbers of the team members.
    pub members: Vec<String>,
    /// Current score for the team.
    pub score: i64,
    /// Last time this team was updated.
    pub updated_at: SystemTime,
}

impl TeamEntity {
    /// Build a brand-new team with a freshly generated identifier.
    pub fn new(members: Vec<String>, score: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            members,
            score,
            updated_at: SystemTime::now(),
        }
    }

    /// Whether the roll number (already normalized) belongs to this team.
    pub fn has_member(&self, roll_no: &str) -> bool {
        self.members.iter().any(|member| member == roll_no)
    }
}

/// Outcome of writing a team keyed by its exact member set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No team had that member set; a new one was created.
    Inserted,
    /// A team with the same member set got a new score.
    Updated,
    /// A team with the same member set already had that score.
    Unchanged,
}

/// Counts reported after the collection was replaced wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Teams deleted before inserting the new set.
    pub removed: u64,
    /// Teams inserted from the new set.
    pub inserted: u64,
}
