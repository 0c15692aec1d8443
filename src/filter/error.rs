use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unknown {entity} field: {field}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{min} cannot be greater than {max}")]
    InvalidRange { min: &'static str, max: &'static str },

    #[error("No data to update")]
    EmptyUpdate,
}
