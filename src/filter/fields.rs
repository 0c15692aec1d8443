// Allow-lists: the only columns and operators a request can reach.

use super::types::{ClauseOp, FieldKind, FieldMap, FieldRule, RangeRule};

const NAME: FieldKind = FieldKind::Text { min: 1, max: 255 };
const PERSON_NAME: FieldKind = FieldKind::Text { min: 1, max: 30 };
const COUNT: FieldKind = FieldKind::Integer {
    min: Some(0),
    max: Some(i32::MAX as i64),
};

pub const COMPANY_FILTERS: FieldMap = FieldMap {
    entity: "company",
    fields: &[
        FieldRule::new("name", "name", ClauseOp::ILike, NAME),
        FieldRule::new("minEmployees", "num_employees", ClauseOp::Gte, COUNT),
        FieldRule::new("maxEmployees", "num_employees", ClauseOp::Lte, COUNT),
    ],
    ranges: &[RangeRule { min: "minEmployees", max: "maxEmployees" }],
};

pub const JOB_FILTERS: FieldMap = FieldMap {
    entity: "job",
    fields: &[
        FieldRule::new("title", "title", ClauseOp::ILike, NAME),
        FieldRule::new("minSalary", "salary", ClauseOp::Gte, COUNT),
        FieldRule::new("hasEquity", "equity", ClauseOp::Positive, FieldKind::Boolean),
    ],
    ranges: &[],
};

pub const COMPANY_UPDATE: FieldMap = FieldMap {
    entity: "company",
    fields: &[
        FieldRule::new("name", "name", ClauseOp::Eq, NAME),
        FieldRule::new("description", "description", ClauseOp::Eq, FieldKind::Text { min: 0, max: 10_000 }),
        FieldRule::new("numEmployees", "num_employees", ClauseOp::Eq, COUNT),
        FieldRule::new("logoUrl", "logo_url", ClauseOp::Eq, FieldKind::Url),
    ],
    ranges: &[],
};

pub const JOB_UPDATE: FieldMap = FieldMap {
    entity: "job",
    fields: &[
        FieldRule::new("title", "title", ClauseOp::Eq, NAME),
        FieldRule::new("salary", "salary", ClauseOp::Eq, COUNT),
        FieldRule::new("equity", "equity", ClauseOp::Eq, FieldKind::Equity).with_cast("numeric"),
    ],
    ranges: &[],
};

/// `password` must already be hashed; `isAdmin` is deliberately absent.
pub const USER_UPDATE: FieldMap = FieldMap {
    entity: "user",
    fields: &[
        FieldRule::new("firstName", "first_name", ClauseOp::Eq, PERSON_NAME),
        FieldRule::new("lastName", "last_name", ClauseOp::Eq, PERSON_NAME),
        FieldRule::new("password", "password", ClauseOp::Eq, FieldKind::Hashed),
        FieldRule::new("email", "email", ClauseOp::Eq, FieldKind::Email),
    ],
    ranges: &[],
};
