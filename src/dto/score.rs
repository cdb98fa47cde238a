//! DTO definitions for the score endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::TeamEntity,
    dto::{format_system_time, validation::validate_roll_number},
};

/// Query string of the score lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RollNoQuery {
    /// Roll number whose team score is requested.
    #[serde(rename = "rollNo")]
    pub roll_no: Option<String>,
}

/// Request to move a team score by `change` points.
#[serde_as]
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChangeRequest {
    #[validate(custom(function = "validate_roll_number"))]
    pub roll_no: String,
    /// Integer amount, also accepted as a numeric string. Only its magnitude is used.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schema(value_type = i64)]
    pub change: i64,
}

/// Score of the team owning a roll number.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub team_id: Uuid,
    pub score: i64,
    pub members: Vec<String>,
}

/// Result of a score adjustment, returning the updated tally.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateResponse {
    pub team_id: Uuid,
    pub score: i64,
}

/// Team row of the scoreboard listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team_id: Uuid,
    pub members: Vec<String>,
    pub score: i64,
    /// RFC 3339 timestamp of the last change.
    pub updated_at: String,
}

impl From<TeamEntity> for TeamSummary {
    fn from(team: TeamEntity) -> Self {
        Self {
            team_id: team.id,
            members: team.members,
            score: team.score,
            updated_at: format_system_time(team.updated_at),
        }
    }
}

/// Every registered team with its score.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    pub teams: Vec<TeamSummary>,
    pub count: usize,
}

impl From<Vec<TeamEntity>> for TeamsResponse {
    fn from(teams: Vec<TeamEntity>) -> Self {
        let teams: Vec<TeamSummary> = teams.into_iter().map(Into::into).collect();
        Self {
            count: teams.len(),
            teams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_accepts_number_or_numeric_string() {
        let numeric: ScoreChangeRequest =
            serde_json::from_str(r#"{"rollNo": "a1", "change": 5}"#).unwrap();
        assert_eq!(numeric.change, 5);

        let text: ScoreChangeRequest =
            serde_json::from_str(r#"{"rollNo": "a1", "change": "-7"}"#).unwrap();
        assert_eq!(text.change, -7);
    }

    #[test]
    fn change_rejects_non_integer() {
        assert!(
            serde_json::from_str::<ScoreChangeRequest>(r#"{"rollNo": "a1", "change": "five"}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<ScoreChangeRequest>(r#"{"rollNo": "a1"}"#).is_err());
    }

    #[test]
    fn empty_roll_number_fails_validation() {
        let request: ScoreChangeRequest =
            serde_json::from_str(r#"{"rollNo": "", "change": 1}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn roll_number_length_is_measured_after_trimming() {
        let padded = format!(r#"{{"rollNo": "  {}  ", "change": 1}}"#, "x".repeat(64));
        let request: ScoreChangeRequest = serde_json::from_str(&padded).unwrap();
        assert!(request.validate().is_ok());

        let long = format!(r#"{{"rollNo": "{}", "change": 1}}"#, "x".repeat(65));
        let request: ScoreChangeRequest = serde_json::from_str(&long).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_roll_number_fails_validation() {
        let request: ScoreChangeRequest =
            serde_json::from_str(r#"{"rollNo": "   ", "change": 1}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
