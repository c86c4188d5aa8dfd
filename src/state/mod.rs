pub mod match_state;
pub mod rest_break;
pub mod state_machine;
pub mod timer;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::court_store::CourtStore, error::ServiceError};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and configuration.
pub struct AppState {
    config: AppConfig,
    court_store: RwLock<Option<Arc<dyn CourtStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            court_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current court store, if one is installed.
    pub async fn court_store(&self) -> Option<Arc<dyn CourtStore>> {
        let guard = self.court_store.read().await;
        guard.as_ref().cloned()
    }

    /// Court store handle, or a degraded-mode error when none is installed.
    pub async fn require_court_store(&self) -> Result<Arc<dyn CourtStore>, ServiceError> {
        self.court_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new court store implementation and leave degraded mode.
    pub async fn install_court_store(&self, store: Arc<dyn CourtStore>) {
        {
            let mut guard = self.court_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current court store and enter degraded mode.
    pub async fn clear_court_store(&self) {
        {
            let mut guard = self.court_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.court_store.read().await;
        guard.is_none() || *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub(crate) fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}
