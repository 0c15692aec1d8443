//! Request body shapes and the checks each must pass before a handler
//! touches the database.

pub mod company;
pub mod job;
pub mod rules;
pub mod user;

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::ApiError;

pub use company::NewCompany;
pub use job::NewJob;
pub use user::{LoginRequest, NewUser, RegisterRequest};

/// Semantic validation run after deserialization succeeds.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Partial-update bodies are checked key by key by the clause builder.
impl Validate for Map<String, Value> {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Collects per-field failures so one response reports all of them.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(msg) = result {
            self.0.entry(field.to_string()).or_insert(msg);
        }
        self
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid request body", Some(self.0)))
        }
    }
}
