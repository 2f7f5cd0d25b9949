pub mod db;
pub mod error;
pub mod fields;
pub mod models;
pub mod query;
pub mod seed;
pub mod transform;

pub use error::{MyraError, Result};
