//! HTTP handlers for goat CRUD.

pub mod goats;
pub use goats::*;
