use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use validator::Validate;

use crate::{
    dto::registration::{GroupRegistrationResponse, RegistrationRequest, RegistrationResponse},
    error::AppError,
    services::registration_service,
    state::SharedState,
};

/// Registration endpoints, mounted under `/registrations`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/registrations", post(register))
        .route("/registrations/group", post(register_group))
}

/// Register each roll number as its own team.
#[utoipa::path(
    post,
    path = "/registrations",
    tag = "registration",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Roll numbers split into added and existed", body = RegistrationResponse),
        (status = 400, description = "Missing or malformed rollNo"),
        (status = 503, description = "Storage unavailable (degraded mode)")
    )
)]
pub async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(Json(registration_service::register(&state, payload).await?))
}

/// Register all roll numbers together as a single team.
#[utoipa::path(
    post,
    path = "/registrations/group",
    tag = "registration",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Group created, or reported as overlapping an existing team", body = GroupRegistrationResponse),
        (status = 400, description = "Missing or malformed rollNo"),
        (status = 503, description = "Storage unavailable (degraded mode)")
    )
)]
pub async fn register_group(
    State(state): State<SharedState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<GroupRegistrationResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(Json(
        registration_service::register_group(&state, payload).await?,
    ))
}
