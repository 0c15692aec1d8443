use rust_decimal::Decimal;
use serde::Deserialize;

use super::{rules, FieldErrors, Validate};
use crate::error::ApiError;

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl NewJob {
    /// Parsed equity; only meaningful after `validate` succeeded.
    pub fn equity_decimal(&self) -> Option<Decimal> {
        self.equity.as_deref().and_then(|e| rules::check_equity(e).ok())
    }
}

impl Validate for NewJob {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .check("title", rules::check_length(&self.title, 1, 255))
            .check("companyHandle", rules::check_handle(&self.company_handle));
        if let Some(salary) = self.salary {
            errors.check("salary", rules::check_min(salary.into(), 0));
        }
        if let Some(equity) = &self.equity {
            errors.check("equity", rules::check_equity(equity).map(|_| ()));
        }
        errors.into_result()
    }
}
