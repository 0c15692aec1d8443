use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{ClauseOp, ClauseResult, FieldKind, FieldMap, FieldRule};
use crate::schemas::rules;

/// Build a `WHERE` body: fragments joined by `AND`.
pub fn build_filter_clause(fields: &Map<String, Value>, map: &FieldMap) -> Result<ClauseResult, FilterError> {
    build_clause(fields, map, " AND ")
}

/// Build a `SET` list: `column = $n` fragments joined by commas.
pub fn build_update_clause(fields: &Map<String, Value>, map: &FieldMap) -> Result<ClauseResult, FilterError> {
    if fields.is_empty() {
        return Err(FilterError::EmptyUpdate);
    }
    build_clause(fields, map, ", ")
}

/// Translate an allow-listed field mapping into a parameterized fragment.
///
/// Every key is checked and coerced before anything is emitted, so a
/// failure never leaves a partial clause behind. Fragment and placeholder
/// order follow the iteration order of `fields`.
pub fn build_clause(fields: &Map<String, Value>, map: &FieldMap, joiner: &str) -> Result<ClauseResult, FilterError> {
    let mut accepted: Vec<(&FieldRule, Value)> = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let rule = map.rule(key).ok_or_else(|| FilterError::UnknownField {
            entity: map.entity,
            field: key.clone(),
        })?;
        accepted.push((rule, coerce(rule, value)?));
    }

    check_ranges(&accepted, map)?;

    let mut fragments = Fragments::default();
    for (rule, value) in accepted {
        fragments.push(rule, value);
    }
    Ok(fragments.finish(joiner))
}

#[derive(Default)]
struct Fragments {
    parts: Vec<String>,
    values: Vec<Value>,
}

impl Fragments {
    fn push(&mut self, rule: &FieldRule, value: Value) {
        match rule.op {
            ClauseOp::Positive => {
                if value == Value::Bool(true) {
                    self.parts.push(format!("{} {} 0", rule.column, rule.op.to_sql()));
                }
            }
            ClauseOp::ILike => {
                let pattern = Value::String(contains_pattern(value.as_str().unwrap_or_default()));
                let placeholder = self.param(pattern, rule.cast);
                self.parts.push(format!("{} {} {}", rule.column, rule.op.to_sql(), placeholder));
            }
            ClauseOp::Eq | ClauseOp::Gte | ClauseOp::Lte => {
                let placeholder = self.param(value, rule.cast);
                self.parts.push(format!("{} {} {}", rule.column, rule.op.to_sql(), placeholder));
            }
        }
    }

    fn param(&mut self, value: Value, cast: Option<&str>) -> String {
        self.values.push(value);
        match cast {
            Some(cast) => format!("${}::{}", self.values.len(), cast),
            None => format!("${}", self.values.len()),
        }
    }

    fn finish(self, joiner: &str) -> ClauseResult {
        ClauseResult {
            clause: self.parts.join(joiner),
            values: self.values,
        }
    }
}

/// `%needle%` with LIKE wildcards in the needle matched literally.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

fn check_ranges(accepted: &[(&FieldRule, Value)], map: &FieldMap) -> Result<(), FilterError> {
    let lookup = |key: &str| {
        accepted
            .iter()
            .find(|(rule, _)| rule.key == key)
            .and_then(|(_, value)| value.as_i64())
    };

    for range in map.ranges {
        if let (Some(min), Some(max)) = (lookup(range.min), lookup(range.max)) {
            if min > max {
                return Err(FilterError::InvalidRange { min: range.min, max: range.max });
            }
        }
    }
    Ok(())
}

fn coerce(rule: &FieldRule, value: &Value) -> Result<Value, FilterError> {
    let invalid = |reason: String| FilterError::InvalidValue {
        field: rule.key.to_string(),
        reason,
    };
    let as_str = || value.as_str().ok_or_else(|| invalid("expected a string".to_string()));

    match rule.kind {
        FieldKind::Text { min, max } => {
            let s = as_str()?;
            rules::check_length(s, min, max).map_err(invalid)?;
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Integer { min, max } => {
            let n = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| invalid("expected an integer".to_string()))?;
            if let Some(min) = min {
                if n < min {
                    return Err(invalid(format!("must be at least {}", min)));
                }
            }
            if let Some(max) = max {
                if n > max {
                    return Err(invalid(format!("must be at most {}", max)));
                }
            }
            Ok(Value::from(n))
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("expected true or false".to_string())),
        },
        FieldKind::Equity => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(invalid("expected a decimal".to_string())),
            };
            rules::check_equity(&text).map_err(invalid)?;
            Ok(Value::String(text))
        }
        FieldKind::Email => {
            let s = as_str()?;
            rules::check_email(s).map_err(invalid)?;
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Url => {
            let s = as_str()?;
            rules::check_url(s).map_err(invalid)?;
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Hashed => {
            let s = as_str()?;
            if s.is_empty() {
                return Err(invalid("must not be empty".to_string()));
            }
            Ok(Value::String(s.to_string()))
        }
    }
}
