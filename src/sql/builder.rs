//! Parameterized SELECT, INSERT, UPDATE, DELETE against the `goats` table.

use super::params::SqlParam;

pub const SELECT_ALL: &str = "SELECT * FROM goats ORDER BY id";
pub const SELECT_BY_ID: &str = "SELECT * FROM goats WHERE id = $1";
pub const INSERT: &str = "INSERT INTO goats(name, age) VALUES ($1, $2) RETURNING *";
pub const UPDATE: &str = "UPDATE goats SET name = $1, age = $2 WHERE id = $3 RETURNING *";
pub const DELETE: &str = "DELETE FROM goats WHERE id = $1 RETURNING *";

/// One statement plus its positional parameters (`$1` is `params[0]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: &'static str,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new(sql: &'static str) -> Self {
        QueryBuf {
            sql,
            params: Vec::new(),
        }
    }

    fn bind(mut self, p: impl Into<SqlParam>) -> Self {
        self.params.push(p.into());
        self
    }
}

pub fn select_all() -> QueryBuf {
    QueryBuf::new(SELECT_ALL)
}

pub fn select_by_id(id: i32) -> QueryBuf {
    QueryBuf::new(SELECT_BY_ID).bind(id)
}

pub fn insert(name: &str, age: i32) -> QueryBuf {
    QueryBuf::new(INSERT).bind(name).bind(age)
}

/// Full replace of `name` and `age`; partial updates are never built.
pub fn update(id: i32, name: &str, age: i32) -> QueryBuf {
    QueryBuf::new(UPDATE).bind(name).bind(age).bind(id)
}

pub fn delete(id: i32) -> QueryBuf {
    QueryBuf::new(DELETE).bind(id)
}
