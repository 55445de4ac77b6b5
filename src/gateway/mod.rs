//! Database gateway: executes one parameterized statement and returns its rows.
//!
//! Rows are JSON objects keyed by column name. [`PgGateway`] talks to PostgreSQL
//! through a sqlx pool; [`MemoryGateway`] serves the same statements from an
//! in-process table.

mod memory;
mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

use crate::error::GatewayError;
use crate::sql::QueryBuf;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run `q` and return every row it produced, in order.
    async fn query(&self, q: &QueryBuf) -> Result<Vec<Value>, GatewayError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), GatewayError>;
}
