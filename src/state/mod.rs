use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::RwLock;

use crate::{config::AppConfig, dao::team_store::TeamStore, error::ServiceError};

/// Handle to [`AppState`] shared by every request handler.
pub type SharedState = Arc<AppState>;

/// Central application state holding the configuration and the team store handle.
pub struct AppState {
    config: AppConfig,
    team_store: RwLock<Option<Arc<dyn TeamStore>>>,
    degraded: AtomicBool,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            team_store: RwLock::new(None),
            degraded: AtomicBool::new(true),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current team store, if one is installed.
    pub async fn team_store(&self) -> Option<Arc<dyn TeamStore>> {
        let guard = self.team_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current team store or fail with [`ServiceError::Degraded`].
    pub async fn require_team_store(&self) -> Result<Arc<dyn TeamStore>, ServiceError> {
        self.team_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new team store implementation and leave degraded mode.
    pub async fn set_team_store(&self, store: Arc<dyn TeamStore>) {
        {
            let mut guard = self.team_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current team store and enter degraded mode.
    pub async fn clear_team_store(&self) {
        {
            let mut guard = self.team_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Flip the degraded flag, e.g. while the store is reconnecting.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.store(value, Ordering::Release);
    }
}
