use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Cyberoscope Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::registration::register,
        crate::routes::registration::register_group,
        crate::routes::score::score_display,
        crate::routes::score::score_add,
        crate::routes::score::score_subtract,
        crate::routes::score::list_teams,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::registration::RegistrationRequest,
            crate::dto::registration::RegistrationResponse,
            crate::dto::registration::RegisteredRollNo,
            crate::dto::registration::GroupRegistrationResponse,
            crate::dto::registration::GroupTeam,
            crate::dto::score::ScoreChangeRequest,
            crate::dto::score::ScoreResponse,
            crate::dto::score::ScoreUpdateResponse,
            crate::dto::score::TeamSummary,
            crate::dto::score::TeamsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "registration", description = "Team registration"),
        (name = "score", description = "Team scores"),
    )
)]
pub struct ApiDoc;
