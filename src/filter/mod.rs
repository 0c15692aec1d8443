pub mod clause;
pub mod error;
pub mod fields;
pub mod types;

pub use clause::{build_clause, build_filter_clause, build_update_clause};
pub use error::FilterError;
pub use types::*;
