//! Translation of flat query-string parameters into typed list parameters.
//!
//! The list endpoint accepts arbitrary `field` or `field[op]` keys. Keys are
//! resolved against the record's fields here, as an explicit mapping; raw
//! strings never reach the store's query language. Unknown operators are
//! rejected, unknown fields become an unmatchable predicate ("no document
//! has that field").

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Query-string keys that are not filters.
const RESERVED_KEYS: [&str; 3] = ["sort", "page", "limit"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
}

impl Cmp {
    fn parse_suffix(op: &str) -> Option<Self> {
        match op {
            "gte" => Some(Cmp::Gte),
            "gt" => Some(Cmp::Gt),
            "lte" => Some(Cmp::Lte),
            "lt" => Some(Cmp::Lt),
            _ => None,
        }
    }
}

/// One field-level predicate. Filters AND together.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Description(String),
    Category(String),
    Amount(Cmp, f64),
    Date(Cmp, DateTime<FixedOffset>),
    /// Unknown field name: matches no stored record.
    Unmatchable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Date,
    Amount,
    Description,
    Category,
    CreatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Default ordering: newest date first.
pub fn default_sort() -> Vec<SortKey> {
    vec![SortKey { field: SortField::Date, descending: true }]
}

#[derive(Clone, Debug)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    pub sort: Vec<SortKey>,
    pub page: Pagination,
}

/// Parse the full query-string map for the list endpoint.
pub fn parse_list_params(params: &HashMap<String, String>) -> Result<ListParams, ServiceError> {
    let mut filters = Vec::new();
    for (key, value) in params {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        filters.push(parse_filter(key, value)?);
    }
    let sort = match params.get("sort") {
        Some(raw) => parse_sort(raw),
        None => default_sort(),
    };
    let page = Pagination {
        page: parse_clamped(params.get("page"), "page", 1)?,
        per_page: parse_clamped(params.get("limit"), "limit", 10)?,
    };
    Ok(ListParams { filters, sort, page })
}

fn parse_filter(key: &str, value: &str) -> Result<Filter, ServiceError> {
    let (field, op) = split_key(key)?;
    let cmp = match op {
        None => Cmp::Eq,
        Some(suffix) => Cmp::parse_suffix(suffix).ok_or_else(|| {
            ServiceError::Validation(format!("unknown filter operator '{}'", suffix))
        })?,
    };
    match field {
        "description" => {
            reject_range(field, cmp)?;
            Ok(Filter::Description(value.to_string()))
        }
        "category" => {
            // exact match only; no enum validation on the filter side
            reject_range(field, cmp)?;
            Ok(Filter::Category(value.to_string()))
        }
        "amount" => {
            let amount: f64 = value
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| {
                    ServiceError::Validation(format!("amount filter must be numeric, got '{}'", value))
                })?;
            Ok(Filter::Amount(cmp, amount))
        }
        "date" => Ok(Filter::Date(cmp, parse_date_value(value)?)),
        other => {
            if op.is_some() {
                return Err(ServiceError::Validation(format!(
                    "range comparison not supported on field '{}'",
                    other
                )));
            }
            Ok(Filter::Unmatchable(other.to_string()))
        }
    }
}

/// Split `field` or `field[op]` into its parts.
fn split_key(key: &str) -> Result<(&str, Option<&str>), ServiceError> {
    match key.find('[') {
        None => Ok((key, None)),
        Some(start) => {
            let malformed = || ServiceError::Validation(format!("malformed filter key '{}'", key));
            if !key.ends_with(']') {
                return Err(malformed());
            }
            let field = &key[..start];
            let op = &key[start + 1..key.len() - 1];
            if field.is_empty() || op.is_empty() || op.contains('[') {
                return Err(malformed());
            }
            Ok((field, Some(op)))
        }
    }
}

fn reject_range(field: &str, cmp: Cmp) -> Result<(), ServiceError> {
    if cmp != Cmp::Eq {
        return Err(ServiceError::Validation(format!(
            "range comparison not supported on field '{}'",
            field
        )));
    }
    Ok(())
}

/// Filter dates accept RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_date_value(value: &str) -> Result<DateTime<FixedOffset>, ServiceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    Err(ServiceError::Validation(format!(
        "date filter must be RFC 3339 or YYYY-MM-DD, got '{}'",
        value
    )))
}

fn parse_sort(raw: &str) -> Vec<SortKey> {
    let mut keys = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (name, descending) = match part.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (part, false),
        };
        let field = match name {
            "date" => SortField::Date,
            "amount" => SortField::Amount,
            "description" => SortField::Description,
            "category" => SortField::Category,
            "createdAt" => SortField::CreatedAt,
            // unknown sort keys are ignored rather than rejected
            _ => continue,
        };
        keys.push(SortKey { field, descending });
    }
    if keys.is_empty() {
        return default_sort();
    }
    keys
}

/// Parse a 1-based page-size style parameter; values below 1 clamp to 1.
fn parse_clamped(raw: Option<&String>, name: &str, default: u32) -> Result<u32, ServiceError> {
    match raw {
        None => Ok(default),
        Some(s) => {
            let n: i64 = s.parse().map_err(|_| {
                ServiceError::Validation(format!("{} must be an integer, got '{}'", name, s))
            })?;
            Ok(n.clamp(1, u32::MAX as i64) as u32)
        }
    }
}
