//! Goat statements: fixed SQL text, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
