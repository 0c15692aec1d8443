use serde::Deserialize;

use super::{rules, FieldErrors, Validate};
use crate::error::ApiError;

/// Body of `POST /companies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl Validate for NewCompany {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .check("handle", rules::check_handle(&self.handle))
            .check("name", rules::check_length(&self.name, 1, 255))
            .check("description", rules::check_length(&self.description, 0, 10_000));
        if let Some(n) = self.num_employees {
            errors.check("numEmployees", rules::check_min(n.into(), 0));
        }
        if let Some(url) = &self.logo_url {
            errors.check("logoUrl", rules::check_url(url));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<NewCompany, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn accepts_minimal_company() {
        let company = parse(json!({ "handle": "new", "name": "New" })).unwrap();
        assert!(company.validate().is_ok());
        assert_eq!(company.description, "");
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(parse(json!({ "handle": "new", "name": "New", "ceo": "someone" })).is_err());
    }

    #[test]
    fn reports_every_bad_field() {
        let company = parse(json!({
            "handle": "Not A Slug",
            "name": "",
            "numEmployees": -5,
            "logoUrl": "not-a-url"
        }))
        .unwrap();

        match company.validate() {
            Err(ApiError::ValidationError { field_errors: Some(fields), .. }) => {
                assert!(fields.contains_key("handle"));
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("numEmployees"));
                assert!(fields.contains_key("logoUrl"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
