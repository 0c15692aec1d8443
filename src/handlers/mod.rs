pub mod auth;
pub mod companies;
pub mod jobs;
pub mod root;
pub mod users;

use serde_json::{Map, Value};

/// Query-string pairs as an ordered field map for the clause builder.
///
/// Values stay strings here; the builder coerces them per field kind.
pub(crate) fn query_fields(params: Vec<(String, String)>) -> Map<String, Value> {
    params.into_iter().map(|(key, value)| (key, Value::String(value))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_fields_keep_order() {
        let fields = query_fields(vec![
            ("maxEmployees".to_string(), "100".to_string()),
            ("name".to_string(), "net".to_string()),
        ]);
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["maxEmployees", "name"]);
        assert_eq!(fields["maxEmployees"], Value::String("100".to_string()));
    }
}
