//! Team registration: per-roll-number (default) and whole-group policies.
//!
//! Both rely on the store rejecting a roll number already held by another
//! team; a rejected insert means a concurrent request won and the roll
//! number is reported as existing.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    dao::{models::TeamEntity, storage::StorageError, team_store::TeamStore},
    dto::registration::{
        GroupRegistrationResponse, GroupTeam, RegisteredRollNo, RegistrationRequest,
        RegistrationResponse,
    },
    error::ServiceError,
    roll_no,
    state::SharedState,
};

/// Register every submitted roll number independently, one single-member team each.
pub async fn register(
    state: &SharedState,
    request: RegistrationRequest,
) -> Result<RegistrationResponse, ServiceError> {
    let roll_nos = roll_no::normalize_all(&request.roll_no);
    if roll_nos.is_empty() {
        return Err(ServiceError::InvalidInput(
            "no valid roll numbers provided".into(),
        ));
    }

    let store = state.require_team_store().await?;
    let initial_score = state.config().initial_score();

    let mut response = RegistrationResponse::default();
    for roll_no in roll_nos {
        match register_one(&store, roll_no, initial_score).await? {
            Registration::Added(entry) => response.added.push(entry),
            Registration::Existed(entry) => response.existed.push(entry),
        }
    }

    Ok(response)
}

enum Registration {
    Added(RegisteredRollNo),
    Existed(RegisteredRollNo),
}

async fn register_one(
    store: &Arc<dyn TeamStore>,
    roll_no: String,
    initial_score: i64,
) -> Result<Registration, ServiceError> {
    if let Some(team) = store.find_by_member(roll_no.clone()).await? {
        return Ok(Registration::Existed(RegisteredRollNo {
            roll_no,
            team_id: team.id,
        }));
    }

    let team = TeamEntity::new(vec![roll_no.clone()], initial_score);
    let team_id = team.id;
    match store.insert_team(team).await {
        Ok(()) => {
            info!(%team_id, roll_no = %roll_no, "registered new team");
            Ok(Registration::Added(RegisteredRollNo { roll_no, team_id }))
        }
        Err(err) if err.is_conflict() => {
            debug!(roll_no = %roll_no, error = %err, "concurrent registration detected");
            let team = owning_team_after_conflict(store, vec![roll_no.clone()], err).await?;
            Ok(Registration::Existed(RegisteredRollNo {
                roll_no,
                team_id: team.id,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// Register the submitted roll numbers as one team, or nothing at all.
pub async fn register_group(
    state: &SharedState,
    request: RegistrationRequest,
) -> Result<GroupRegistrationResponse, ServiceError> {
    let members = roll_no::canonical_members(&request.roll_no);
    if members.is_empty() {
        return Err(ServiceError::InvalidInput(
            "no valid roll numbers provided".into(),
        ));
    }

    let store = state.require_team_store().await?;

    if let Some(team) = store.find_by_any_member(members.clone()).await? {
        return Ok(existing_group(members, team));
    }

    let team = TeamEntity::new(members.clone(), state.config().initial_score());
    let team_id = team.id;
    match store.insert_team(team).await {
        Ok(()) => {
            info!(%team_id, members = ?members, "registered new group team");
            Ok(GroupRegistrationResponse {
                added: vec![GroupTeam { team_id, members }],
                ..Default::default()
            })
        }
        Err(err) if err.is_conflict() => {
            debug!(members = ?members, error = %err, "concurrent group registration detected");
            let team = owning_team_after_conflict(&store, members.clone(), err).await?;
            Ok(existing_group(members, team))
        }
        Err(err) => Err(err.into()),
    }
}

fn existing_group(members: Vec<String>, team: TeamEntity) -> GroupRegistrationResponse {
    GroupRegistrationResponse {
        added: Vec::new(),
        existed: members,
        team_id: Some(team.id),
    }
}

/// Re-read the team that won a uniqueness conflict.
async fn owning_team_after_conflict(
    store: &Arc<dyn TeamStore>,
    members: Vec<String>,
    conflict: StorageError,
) -> Result<TeamEntity, ServiceError> {
    store
        .find_by_any_member(members.clone())
        .await?
        .ok_or_else(|| {
            ServiceError::InvalidState(format!(
                "roll number(s) {members:?} conflicted but no owning team was found ({conflict})"
            ))
        })
}
