//! Goat API: REST CRUD over a single `goats` table.

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{ApiError, ConfigError, ErrorExposure, ErrorKind, GatewayError, GoatError};
pub use gateway::{Gateway, MemoryGateway, PgGateway};
pub use model::{Goat, GoatInput, GoatModel, GoatStore, FIXTURE_GOATS};
pub use routes::{app, common_routes, goat_routes};
pub use settings::{Settings, StoreKind};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, open_gateway, reset_fixture};
