//! The goat entity: validation plus the statements behind each CRUD operation.

use crate::error::{GatewayError, GoatError};
use crate::gateway::Gateway;
use crate::sql;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Rows inserted by a fixture reset, ids 1..=3.
pub const FIXTURE_GOATS: [(&str, i32); 3] = [("Lionel Messi", 36), ("Serena Williams", 42), ("Usain Bolt", 37)];

/// One row of the `goats` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goat {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl Goat {
    pub fn from_row(row: Value) -> Result<Self, GoatError> {
        serde_json::from_value(row).map_err(|e| GatewayError::Decode(e.to_string()).into())
    }
}

/// Request payload for create and update. Absent and `null` fields are missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoatInput {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl GoatInput {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        GoatInput {
            name: Some(name.into()),
            age: Some(age),
        }
    }

    /// Blank names count as missing.
    fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

fn first_row(rows: Vec<Value>) -> Option<Value> {
    rows.into_iter().next()
}

/// Every row, ordered by id. Rows are returned as read, not converted to [`Goat`].
pub async fn get_all(gateway: &dyn Gateway) -> Result<Vec<Value>, GoatError> {
    let rows = gateway.query(&sql::select_all()).await?;
    if rows.is_empty() {
        return Err(GoatError::NoGoats);
    }
    Ok(rows)
}

pub async fn find_by_id(gateway: &dyn Gateway, id: i32) -> Result<Goat, GoatError> {
    let rows = gateway.query(&sql::select_by_id(id)).await?;
    let row = first_row(rows).ok_or(GoatError::NotFound)?;
    Goat::from_row(row)
}

/// Checks `name` before `age`; nothing is sent to the gateway when either is missing.
pub async fn create(gateway: &dyn Gateway, input: &GoatInput) -> Result<Goat, GoatError> {
    let name = input.name().ok_or(GoatError::NameMissing)?;
    let age = input.age.ok_or(GoatError::AgeMissing)?;
    let rows = gateway.query(&sql::insert(name, age)).await?;
    let row = first_row(rows).ok_or_else(|| GatewayError::Decode("insert returned no row".into()))?;
    Goat::from_row(row)
}

/// Replaces both fields of `goat`. Either field missing fails with one combined error.
pub async fn update(gateway: &dyn Gateway, goat: &Goat, input: &GoatInput) -> Result<Goat, GoatError> {
    let (Some(name), Some(age)) = (input.name(), input.age) else {
        return Err(GoatError::FieldsMissing);
    };
    let rows = gateway.query(&sql::update(goat.id, name, age)).await?;
    // Row deleted between lookup and update.
    let row = first_row(rows).ok_or(GoatError::NotFound)?;
    Goat::from_row(row)
}

/// Deletes `goat` and returns the removed row. Every failure collapses into `CannotDelete`.
pub async fn destroy(gateway: &dyn Gateway, goat: &Goat) -> Result<Goat, GoatError> {
    delete_row(gateway, goat.id).await.map_err(|cause| {
        tracing::warn!(id = goat.id, error = %cause, "delete failed");
        GoatError::CannotDelete
    })
}

async fn delete_row(gateway: &dyn Gateway, id: i32) -> Result<Goat, GoatError> {
    let rows = gateway.query(&sql::delete(id)).await?;
    let row = first_row(rows).ok_or(GoatError::NotFound)?;
    Goat::from_row(row)
}

/// Goat persistence as seen by the HTTP handlers.
#[async_trait]
pub trait GoatStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Value>, GoatError>;
    async fn find_by_id(&self, id: i32) -> Result<Goat, GoatError>;
    async fn create(&self, input: &GoatInput) -> Result<Goat, GoatError>;
    async fn update(&self, goat: &Goat, input: &GoatInput) -> Result<Goat, GoatError>;
    async fn destroy(&self, goat: &Goat) -> Result<Goat, GoatError>;
}

/// [`GoatStore`] backed by a [`Gateway`].
#[derive(Clone)]
pub struct GoatModel {
    gateway: Arc<dyn Gateway>,
}

impl GoatModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        GoatModel { gateway }
    }
}

#[async_trait]
impl GoatStore for GoatModel {
    async fn get_all(&self) -> Result<Vec<Value>, GoatError> {
        get_all(self.gateway.as_ref()).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Goat, GoatError> {
        find_by_id(self.gateway.as_ref(), id).await
    }

    async fn create(&self, input: &GoatInput) -> Result<Goat, GoatError> {
        create(self.gateway.as_ref(), input).await
    }

    async fn update(&self, goat: &Goat, input: &GoatInput) -> Result<Goat, GoatError> {
        update(self.gateway.as_ref(), goat, input).await
    }

    async fn destroy(&self, goat: &Goat) -> Result<Goat, GoatError> {
        destroy(self.gateway.as_ref(), goat).await
    }
}
