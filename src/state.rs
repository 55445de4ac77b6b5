//! Shared application state for all routes.

use crate::error::ErrorExposure;
use crate::gateway::Gateway;
use crate::model::{GoatModel, GoatStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub goats: Arc<dyn GoatStore>,
    /// Used by the readiness probe.
    pub gateway: Arc<dyn Gateway>,
    pub errors: ErrorExposure,
}

impl AppState {
    /// State whose goat store is a [`GoatModel`] over `gateway`.
    pub fn with_gateway(gateway: Arc<dyn Gateway>, errors: ErrorExposure) -> Self {
        AppState {
            goats: Arc::new(GoatModel::new(gateway.clone())),
            gateway,
            errors,
        }
    }
}
