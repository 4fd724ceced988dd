//! # Query String Translator
//!
//! Turns raw query-string pairs into a [`QueryDescriptor`].
//!
//! ```text
//! ?tuition[gte]=5000&careers[in]=Business,UI/UX&select=name,tuition&sort=-tuition&page=2&limit=10
//! ```
//!
//! Reserved keys (`select`, `sort`, `page`, `limit`) never become filters.
//! Operators are recognised only as a whole bracketed suffix on the key, so
//! field names and values that merely contain `in` or `gt` are left alone.
//! Translation is pure: nothing is executed here.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::filter::{FilterExpr, FilterOperator, FilterSet};
use super::pagination::Pagination;
use super::sort::SortKey;

/// Keys consumed by the translator itself
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Identity field, always kept by projections
pub const ID_FIELD: &str = "id";

/// Sort applied when the request has none
pub fn default_sort() -> Vec<SortKey> {
    vec![SortKey::desc("createdAt")]
}

/// Structured, per-request query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    /// Filter predicate
    pub filter: FilterSet,

    /// Fields to keep (None = all)
    pub select: Option<Vec<String>>,

    /// Sort keys in priority order (empty = default sort)
    pub sort: Vec<SortKey>,

    /// Page window
    pub pagination: Pagination,
}

impl QueryDescriptor {
    /// Translate raw query-string pairs
    pub fn parse(params: &HashMap<String, String>) -> QueryResult<Self> {
        let mut descriptor = QueryDescriptor {
            pagination: Pagination::from_raw(
                params.get("page").map(String::as_str),
                params.get("limit").map(String::as_str),
            ),
            ..Default::default()
        };

        if let Some(select) = params.get("select") {
            descriptor.select = parse_select(select);
        }
        if let Some(sort) = params.get("sort") {
            descriptor.sort = parse_sort(sort)?;
        }

        // Sorted so the translated filter is deterministic
        let filters: BTreeMap<&String, &String> = params
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .collect();

        for (key, value) in filters {
            descriptor.filter.filters.push(parse_filter(key, value)?);
        }

        Ok(descriptor)
    }

    /// Restrict results further, e.g. to one parent's children
    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter.filters.push(filter);
        self
    }

    /// Sort keys to apply, falling back to newest-first
    pub fn effective_sort(&self) -> Vec<SortKey> {
        if self.sort.is_empty() {
            default_sort()
        } else {
            self.sort.clone()
        }
    }

    /// Whether `field` survives the projection
    pub fn selects(&self, field: &str) -> bool {
        match &self.select {
            None => true,
            Some(fields) => field == ID_FIELD || fields.iter().any(|f| f == field),
        }
    }
}

/// Reserved keys are matched on the base name, so `page[gt]` is reserved too
fn is_reserved(key: &str) -> bool {
    let base = key.split_once('[').map_or(key, |(base, _)| base);
    RESERVED_KEYS.contains(&base)
}

/// Parse select parameter (comma-separated field list); blank = all fields
fn parse_select(value: &str) -> Option<Vec<String>> {
    let mut fields: Vec<String> = Vec::new();
    for field in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }

    (!fields.is_empty()).then_some(fields)
}

/// Parse sort parameter (comma-separated, `-` prefix for descending)
fn parse_sort(value: &str) -> QueryResult<Vec<SortKey>> {
    let keys: Vec<SortKey> = value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|part| {
            SortKey::parse(part)
                .ok_or_else(|| QueryError::InvalidParam(format!("Invalid sort key: {}", part)))
        })
        .collect::<QueryResult<_>>()?;

    Ok(keys)
}

/// Parse one filter from `field=value` or `field[op]=value`
fn parse_filter(key: &str, value: &str) -> QueryResult<FilterExpr> {
    let (field, operator) = split_operator(key)?;
    validate_field(field)?;

    let value = match operator {
        FilterOperator::In => Value::Array(
            value
                .split(',')
                .map(|item| Value::String(item.trim().to_string()))
                .collect(),
        ),
        _ => Value::String(value.to_string()),
    };

    Ok(FilterExpr::new(field, operator, value))
}

/// Split `tuition[gte]` into (`tuition`, Gte); a plain key is equality
fn split_operator(key: &str) -> QueryResult<(&str, FilterOperator)> {
    let Some(open) = key.find('[') else {
        if key.contains(']') {
            return Err(QueryError::InvalidField(key.to_string()));
        }
        return Ok((key, FilterOperator::Eq));
    };

    let field = &key[..open];
    let token = key[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| QueryError::InvalidField(key.to_string()))?;

    let operator =
        FilterOperator::from_token(token).ok_or_else(|| QueryError::UnsupportedOperator {
            field: field.to_string(),
            operator: token.to_string(),
        })?;

    Ok((field, operator))
}

/// Field names may not be empty, start with `$`, or carry brackets
fn validate_field(field: &str) -> QueryResult<()> {
    let valid = !field.is_empty()
        && !field.starts_with('$')
        && !field.contains(['[', ']'])
        && field.split('.').all(|part| !part.is_empty());

    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidField(field.to_string()))
    }
}
