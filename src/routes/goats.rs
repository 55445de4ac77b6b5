//! Goat CRUD routes.

use crate::handlers::goats::{create, destroy, index, show, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn goat_routes(state: AppState) -> Router {
    Router::new()
        .route("/goats", get(index).post(create))
        .route("/goats/:id", get(show).patch(update).delete(destroy))
        .with_state(state)
}
