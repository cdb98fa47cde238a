use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the degraded flag, logging store connectivity problems on the way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_team_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::from(state.is_degraded())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::team_store::memory::MemoryTeamStore, dto::health::HealthStatus,
        state::AppState,
    };

    #[tokio::test]
    async fn reports_degraded_until_store_installed() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);

        state.set_team_store(Arc::new(MemoryTeamStore::new())).await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Ok);

        state.clear_team_store().await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);
    }
}
