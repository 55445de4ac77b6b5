use super::Gateway;
use crate::error::GatewayError;
use crate::sql::{self, QueryBuf, SqlParam};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// In-process `goats` table answering the statements in [`crate::sql`].
///
/// Ids are assigned from a counter that never goes backwards, like a `SERIAL`.
pub struct MemoryGateway {
    inner: Mutex<Table>,
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, (String, i32)>,
    last_id: i32,
}

impl Table {
    fn row(&self, id: i32) -> Option<Value> {
        self.rows.get(&id).map(|(name, age)| to_row(id, name, *age))
    }
}

fn to_row(id: i32, name: &str, age: i32) -> Value {
    json!({ "id": id, "name": name, "age": age })
}

fn int_param(q: &QueryBuf, idx: usize) -> Result<i32, GatewayError> {
    q.params
        .get(idx)
        .and_then(SqlParam::as_int)
        .ok_or_else(|| GatewayError::Decode(format!("parameter ${} must be an integer", idx + 1)))
}

fn text_param(q: &QueryBuf, idx: usize) -> Result<String, GatewayError> {
    q.params
        .get(idx)
        .and_then(SqlParam::as_text)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::Decode(format!("parameter ${} must be text", idx + 1)))
}

impl MemoryGateway {
    pub fn new() -> Self {
        MemoryGateway {
            inner: Mutex::new(Table::default()),
        }
    }

    /// Table pre-filled with `goats` in order, ids starting at 1.
    pub fn with_goats<'a>(goats: impl IntoIterator<Item = (&'a str, i32)>) -> Self {
        let mut table = Table::default();
        for (name, age) in goats {
            table.last_id += 1;
            table.rows.insert(table.last_id, (name.to_string(), age));
        }
        MemoryGateway {
            inner: Mutex::new(table),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn query(&self, q: &QueryBuf) -> Result<Vec<Value>, GatewayError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (memory)");
        let mut table = self.inner.lock().await;
        let rows: Vec<Value> = match q.sql {
            sql::SELECT_ALL => table
                .rows
                .iter()
                .map(|(id, (name, age))| to_row(*id, name, *age))
                .collect(),
            sql::SELECT_BY_ID => table.row(int_param(q, 0)?).into_iter().collect(),
            sql::INSERT => {
                let name = text_param(q, 0)?;
                let age = int_param(q, 1)?;
                table.last_id += 1;
                let id = table.last_id;
                table.rows.insert(id, (name, age));
                table.row(id).into_iter().collect()
            }
            sql::UPDATE => {
                let name = text_param(q, 0)?;
                let age = int_param(q, 1)?;
                let id = int_param(q, 2)?;
                match table.rows.get_mut(&id) {
                    Some(slot) => {
                        *slot = (name, age);
                        table.row(id).into_iter().collect()
                    }
                    None => Vec::new(),
                }
            }
            sql::DELETE => {
                let id = int_param(q, 0)?;
                table
                    .rows
                    .remove(&id)
                    .map(|(name, age)| to_row(id, &name, age))
                    .into_iter()
                    .collect()
            }
            other => return Err(GatewayError::Unsupported(other.to_string())),
        };
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
