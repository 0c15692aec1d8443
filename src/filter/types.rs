use serde_json::Value;

/// Comparison emitted for a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOp {
    /// `column = $n`
    Eq,
    /// `column ILIKE $n`, value wrapped in `%…%`
    ILike,
    /// `column >= $n`
    Gte,
    /// `column <= $n`
    Lte,
    /// `column > 0` when the boolean value is true, nothing otherwise
    Positive,
}

impl ClauseOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ClauseOp::Eq => "=",
            ClauseOp::ILike => "ILIKE",
            ClauseOp::Gte => ">=",
            ClauseOp::Lte => "<=",
            ClauseOp::Positive => ">",
        }
    }
}

/// Accepted value shape for a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { min: usize, max: usize },
    /// Inclusive bounds; `max` matches the column width
    Integer { min: Option<i64>, max: Option<i64> },
    Boolean,
    /// Decimal string between 0 and 1 inclusive
    Equity,
    Email,
    Url,
    /// Secret that was hashed before reaching the builder
    Hashed,
}

/// One allow-listed input key and the SQL it may produce.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    pub column: &'static str,
    pub op: ClauseOp,
    pub kind: FieldKind,
    pub cast: Option<&'static str>,
}

impl FieldRule {
    pub const fn new(key: &'static str, column: &'static str, op: ClauseOp, kind: FieldKind) -> Self {
        Self { key, column, op, kind, cast: None }
    }

    pub const fn with_cast(mut self, cast: &'static str) -> Self {
        self.cast = Some(cast);
        self
    }
}

/// A `min`/`max` key pair that must satisfy `min <= max` when both are present.
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub min: &'static str,
    pub max: &'static str,
}

/// The complete allow-list for one entity and clause style.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub entity: &'static str,
    pub fields: &'static [FieldRule],
    pub ranges: &'static [RangeRule],
}

impl FieldMap {
    pub fn rule(&self, key: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.key == key)
    }
}

/// Parameterized SQL fragment plus its positional values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseResult {
    pub clause: String,
    pub values: Vec<Value>,
}

impl ClauseResult {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// `" WHERE …"` for a non-empty filter, empty string otherwise.
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }

    /// Index of the next free placeholder, for callers that append their own.
    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }
}
