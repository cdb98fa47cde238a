//! Score lookups and bounded score adjustments for the team owning a roll number.

use tracing::{debug, info};

use crate::{
    dao::models::TeamEntity,
    dto::score::{ScoreResponse, ScoreUpdateResponse, TeamsResponse},
    error::ServiceError,
    roll_no,
    state::SharedState,
};

/// Direction applied to the magnitude of a score change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    /// Bounded by the configured maximum.
    Increase,
    /// Unbounded; scores may go negative.
    Decrease,
}

/// Return the score and members of the team owning `raw_roll_no`.
pub async fn get_score(
    state: &SharedState,
    raw_roll_no: &str,
) -> Result<ScoreResponse, ServiceError> {
    let (_, team) = find_owning_team(state, raw_roll_no).await?;
    Ok(ScoreResponse {
        team_id: team.id,
        score: team.score,
        members: team.members,
    })
}

/// Move the owning team's score by `|change|` in the given direction.
///
/// Increments never push the score past the configured maximum; decrements
/// have no floor.
pub async fn adjust_score(
    state: &SharedState,
    raw_roll_no: &str,
    change: i64,
    direction: ScoreDirection,
) -> Result<ScoreUpdateResponse, ServiceError> {
    let magnitude = change
        .checked_abs()
        .ok_or_else(|| ServiceError::InvalidInput("change is out of range".into()))?;
    let (roll_no, team) = find_owning_team(state, raw_roll_no).await?;
    let max = state.config().max_score();

    let (delta, ceiling) = match direction {
        ScoreDirection::Increase => {
            let next = team
                .score
                .checked_add(magnitude)
                .ok_or_else(|| ServiceError::InvalidInput("score is out of range".into()))?;
            if next > max {
                debug!(
                    team_id = %team.id,
                    current = team.score,
                    max,
                    magnitude,
                    "score increment refused"
                );
                return Err(ServiceError::LimitExceeded {
                    current: team.score,
                    max,
                });
            }
            (magnitude, Some(max))
        }
        ScoreDirection::Decrease => {
            team.score
                .checked_sub(magnitude)
                .ok_or_else(|| ServiceError::InvalidInput("score is out of range".into()))?;
            (-magnitude, None)
        }
    };

    let store = state.require_team_store().await?;
    let Some(updated) = store.adjust_score(team.id, delta, ceiling).await? else {
        // Another writer removed the team or moved its score since the lookup.
        let current = store
            .find_by_member(roll_no)
            .await?
            .ok_or_else(|| ServiceError::NotFound("rollNo not found in any team".into()))?;
        return Err(match ceiling {
            Some(_) => ServiceError::LimitExceeded {
                current: current.score,
                max,
            },
            None => ServiceError::InvalidInput("score is out of range".into()),
        });
    };

    info!(team_id = %updated.id, delta, score = updated.score, "team score adjusted");
    Ok(ScoreUpdateResponse {
        team_id: updated.id,
        score: updated.score,
    })
}

/// Return every team with its members and score.
pub async fn list_teams(state: &SharedState) -> Result<TeamsResponse, ServiceError> {
    let store = state.require_team_store().await?;
    let teams = store.list_teams().await?;
    Ok(teams.into())
}

/// Normalize the roll number and load the team it belongs to.
async fn find_owning_team(
    state: &SharedState,
    raw_roll_no: &str,
) -> Result<(String, TeamEntity), ServiceError> {
    let roll_no = roll_no::normalize(raw_roll_no)
        .ok_or_else(|| ServiceError::InvalidInput("rollNo must not be blank".into()))?;
    let store = state.require_team_store().await?;
    let team = store
        .find_by_member(roll_no.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound("rollNo not found in any team".into()))?;
    Ok((roll_no, team))
}
