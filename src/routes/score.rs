use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, put},
};
use validator::Validate;

use crate::{
    dto::score::{
        RollNoQuery, ScoreChangeRequest, ScoreResponse, ScoreUpdateResponse, TeamsResponse,
    },
    error::AppError,
    services::score_service::{self, ScoreDirection},
    state::SharedState,
};

/// Score endpoints, mounted under `/score`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/score/score_display", get(score_display))
        .route("/score/score_add", put(score_add))
        .route("/score/score_subtract", put(score_subtract))
        .route("/score/teams", get(list_teams))
}

/// Look up the score of the team owning a roll number.
#[utoipa::path(
    get,
    path = "/score/score_display",
    tag = "score",
    params(RollNoQuery),
    responses(
        (status = 200, description = "Team score", body = ScoreResponse),
        (status = 400, description = "rollNo query parameter missing"),
        (status = 404, description = "rollNo not found in any team")
    )
)]
pub async fn score_display(
    State(state): State<SharedState>,
    query: Result<Query<RollNoQuery>, QueryRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Query(query) = query?;
    let roll_no = query
        .roll_no
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("query param 'rollNo' required".into()))?;
    Ok(Json(score_service::get_score(&state, &roll_no).await?))
}

/// Add `|change|` points to the owning team, bounded by the configured maximum.
#[utoipa::path(
    put,
    path = "/score/score_add",
    tag = "score",
    request_body = ScoreChangeRequest,
    responses(
        (status = 200, description = "Updated score", body = ScoreUpdateResponse),
        (status = 400, description = "Invalid payload, or the increment would exceed the maximum"),
        (status = 404, description = "rollNo not found in any team")
    )
)]
pub async fn score_add(
    State(state): State<SharedState>,
    payload: Result<Json<ScoreChangeRequest>, JsonRejection>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    change_score(state, payload, ScoreDirection::Increase).await
}

/// Subtract `|change|` points from the owning team.
#[utoipa::path(
    put,
    path = "/score/score_subtract",
    tag = "score",
    request_body = ScoreChangeRequest,
    responses(
        (status = 200, description = "Updated score", body = ScoreUpdateResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "rollNo not found in any team")
    )
)]
pub async fn score_subtract(
    State(state): State<SharedState>,
    payload: Result<Json<ScoreChangeRequest>, JsonRejection>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    change_score(state, payload, ScoreDirection::Decrease).await
}

async fn change_score(
    state: SharedState,
    payload: Result<Json<ScoreChangeRequest>, JsonRejection>,
    direction: ScoreDirection,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let response =
        score_service::adjust_score(&state, &payload.roll_no, payload.change, direction).await?;
    Ok(Json(response))
}

/// List every team with its members and score.
#[utoipa::path(
    get,
    path = "/score/teams",
    tag = "score",
    responses((status = 200, description = "All teams", body = TeamsResponse))
)]
pub async fn list_teams(State(state): State<SharedState>) -> Result<Json<TeamsResponse>, AppError> {
    Ok(Json(score_service::list_teams(&state).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{models::TeamEntity, team_store::memory::MemoryTeamStore},
        state::AppState,
    };

    async fn app_with_score(score: i64) -> Router {
        let team = TeamEntity::new(vec!["A1".into()], score);
        let store = MemoryTeamStore::with_teams(vec![team]).unwrap();
        let state = AppState::new(AppConfig::default());
        state.set_team_store(Arc::new(store)).await;
        router().with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn display_requires_roll_no() {
        let app = app_with_score(0).await;
        let (status, body) = send(app, get_request("/score/score_display")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("query param 'rollNo' required"));
    }

    #[tokio::test]
    async fn display_unknown_roll_no_is_not_found() {
        let app = app_with_score(0).await;
        let (status, _) = send(app, get_request("/score/score_display?rollNo=zz")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_accepts_numeric_string_and_reports_score() {
        let app = app_with_score(10).await;
        let (status, body) = send(
            app.clone(),
            put_json("/score/score_add", json!({"rollNo": "a1", "change": "5"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 15);

        let (status, body) = send(app, get_request("/score/score_display?rollNo=%20a1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 15);
        assert_eq!(body["members"], json!(["A1"]));
    }

    #[tokio::test]
    async fn add_over_max_reports_current_and_max() {
        let (status, body) = send(
            app_with_score(235).await,
            put_json("/score/score_add", json!({"rollNo": "A1", "change": 6})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["current"], 235);
        assert_eq!(body["max"], 240);
    }

    #[tokio::test]
    async fn subtract_uses_magnitude() {
        let (status, body) = send(
            app_with_score(3).await,
            put_json("/score/score_subtract", json!({"rollNo": "A1", "change": -5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], -2);
    }

    #[tokio::test]
    async fn non_integer_change_is_bad_request() {
        let (status, _) = send(
            app_with_score(0).await,
            put_json("/score/score_add", json!({"rollNo": "A1", "change": "lots"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn teams_listing_includes_count() {
        let app = app_with_score(7).await;
        let (status, body) = send(app, get_request("/score/teams")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["teams"][0]["score"], 7);
        assert!(body["teams"][0]["updatedAt"].is_string());
    }
}
