//! # Filter Expression AST
//!
//! Represents filter predicates built from query strings.
//!
//! Values arrive as raw strings and are coerced to the type of the stored
//! field at match time, the way a document store casts query values against
//! the stored data.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::sort::compare_values;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals
    #[serde(rename = "$eq")]
    Eq,

    /// Greater than
    #[serde(rename = "$gt")]
    Gt,

    /// Greater than or equal
    #[serde(rename = "$gte")]
    Gte,

    /// Less than
    #[serde(rename = "$lt")]
    Lt,

    /// Less than or equal
    #[serde(rename = "$lte")]
    Lte,

    /// Value in list
    #[serde(rename = "$in")]
    In,
}

impl FilterOperator {
    /// Resolve a bracketed query-string token (`gte` in `tuition[gte]`).
    ///
    /// Only whole tokens match: `inx` or `gtee` are not operators.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            _ => None,
        }
    }

    /// Get the comparison-operator form (`$gte`)
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::In => "$in",
        }
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on; dotted paths reach into nested objects
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value.into())
    }

    /// Create an "in list" filter
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::In, Value::Array(values))
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        let Some(field_value) = lookup_path(doc, &self.field) else {
            return false;
        };

        // Array fields match when any element does
        if let Value::Array(items) = field_value {
            if matches!(self.operator, FilterOperator::Eq | FilterOperator::In) {
                return items.iter().any(|item| self.matches_value(item));
            }
        }

        self.matches_value(field_value)
    }

    fn matches_value(&self, field_value: &Value) -> bool {
        match self.operator {
            FilterOperator::Eq => values_equal(field_value, &coerce_like(field_value, &self.value)),
            FilterOperator::In => match &self.value {
                Value::Array(candidates) => candidates
                    .iter()
                    .any(|c| values_equal(field_value, &coerce_like(field_value, c))),
                single => values_equal(field_value, &coerce_like(field_value, single)),
            },
            FilterOperator::Gt => self.ordering(field_value) == Some(Ordering::Greater),
            FilterOperator::Gte => matches!(
                self.ordering(field_value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lt => self.ordering(field_value) == Some(Ordering::Less),
            FilterOperator::Lte => matches!(
                self.ordering(field_value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// Orders the stored value against the filter value; `None` when the
    /// two are not comparable.
    ///
    /// A numeric bound on a string field compares numerically when the
    /// stored text is itself a number (`weeks: "8"`) and never matches
    /// otherwise.
    fn ordering(&self, field_value: &Value) -> Option<Ordering> {
        let bound = coerce_like(field_value, &self.value);
        match (field_value, &bound) {
            (Value::String(stored), Value::String(raw)) => match parse_number(raw) {
                Some(limit) => parse_number(stored)?.partial_cmp(&limit),
                None => Some(stored.cmp(raw)),
            },
            (Value::Number(_), Value::Number(_)) | (Value::Bool(_), Value::Bool(_)) => {
                Some(compare_values(Some(field_value), Some(&bound)))
            }
            _ => None,
        }
    }
}

/// Resolve a dotted path (`location.state`) inside a document
pub fn lookup_path<'a>(doc: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Cast a raw query value to the JSON type of the stored value
fn coerce_like(target: &Value, raw: &Value) -> Value {
    let Value::String(text) = raw else {
        return raw.clone();
    };

    match target {
        Value::Number(_) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| raw.clone()),
        Value::Bool(_) => match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => raw.clone(),
        },
        _ => raw.clone(),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Fields referenced by any filter
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.field.as_str())
    }

    /// Check if a document matches all filters
    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }
}

impl From<FilterExpr> for FilterSet {
    fn from(filter: FilterExpr) -> Self {
        Self {
            filters: vec![filter],
        }
    }
}
