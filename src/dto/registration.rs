//! DTO definitions for the registration endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{OneOrMany, serde_as};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::validation::validate_roll_numbers;

/// Payload carrying one roll number or a list of them.
#[serde_as]
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Either a single roll number or an array of roll numbers.
    #[serde_as(as = "OneOrMany<_>")]
    #[schema(value_type = Vec<String>)]
    #[validate(
        length(min = 1, message = "rollNo must contain at least one entry"),
        custom(function = "validate_roll_numbers")
    )]
    pub roll_no: Vec<String>,
}

/// Roll number paired with the team that owns it.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredRollNo {
    pub roll_no: String,
    pub team_id: Uuid,
}

/// Outcome of a per-roll-number registration batch.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct RegistrationResponse {
    /// Roll numbers that got a brand-new team.
    pub added: Vec<RegisteredRollNo>,
    /// Roll numbers that already belonged to a team.
    pub existed: Vec<RegisteredRollNo>,
}

/// Team created by a group registration.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupTeam {
    pub team_id: Uuid,
    pub members: Vec<String>,
}

/// Outcome of a whole-group registration.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupRegistrationResponse {
    pub added: Vec<GroupTeam>,
    /// Normalized members of a group that overlapped an existing team.
    pub existed: Vec<String>,
    /// Team that caused the overlap, when the group was not created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
}
