//! Schema validator for create and update payloads
//!
//! Validation semantics:
//! - Unknown and internal fields are dropped from client payloads
//! - Strings marked `trim` are trimmed
//! - Values are cast to the declared type where unambiguous ("5000" -> 5000)
//! - Defaults are filled in on create only
//! - Create checks every field; update checks only the fields it changes
//! - All failures are collected, never just the first

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use super::errors::{FieldError, SchemaError, SchemaResult};
use super::types::{DefaultValue, FieldDef, FieldType, Schema};
use crate::store::{Document, DocumentId};

/// Current time in the stored timestamp format
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validates documents against a schema.
///
/// The validator never touches storage; uniqueness is enforced by the
/// store's indexes.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Clean, cast, default and fully validate a create payload
    pub fn prepare_create(&self, payload: Value) -> SchemaResult<Document> {
        let mut document = self.sanitize(payload)?;
        let mut errors = self.cast(&mut document);

        for (name, def) in &self.schema.fields {
            if document.contains_key(name) {
                continue;
            }
            match &def.default {
                Some(DefaultValue::Fixed(value)) => {
                    document.insert(name.clone(), value.clone());
                }
                Some(DefaultValue::Now) => {
                    document.insert(name.clone(), Value::String(now_timestamp()));
                }
                None => {}
            }
        }

        for (name, def) in &self.schema.fields {
            if def.internal {
                continue;
            }
            if errors.iter().any(|e| &e.field == name) {
                continue;
            }
            errors.extend(check_field(name, def, document.get(name)));
        }

        finish(document, errors)
    }

    /// Clean, cast and validate the fields an update changes
    pub fn prepare_update(&self, payload: Value) -> SchemaResult<Document> {
        let mut changes = self.sanitize(payload)?;
        let mut errors = self.cast(&mut changes);

        for (name, def) in &self.schema.fields {
            let Some(value) = changes.get(name) else {
                continue;
            };
            if errors.iter().any(|e| &e.field == name) {
                continue;
            }
            errors.extend(check_field(name, def, Some(value)));
        }

        finish(changes, errors)
    }

    /// Require an object and keep only client-writable schema fields
    fn sanitize(&self, payload: Value) -> SchemaResult<Document> {
        let Value::Object(object) = payload else {
            return Err(SchemaError::NotAnObject {
                model: self.schema.name.clone(),
            });
        };

        Ok(object
            .into_iter()
            .filter(|(key, _)| self.schema.get(key).is_some_and(|def| !def.internal))
            .collect())
    }

    /// Trim and cast in place, returning cast failures
    fn cast(&self, document: &mut Document) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (name, value) in document.iter_mut() {
            let Some(def) = self.schema.get(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            if def.trim {
                if let Value::String(s) = value {
                    *s = s.trim().to_string();
                }
            }

            match cast_value(&def.field_type, value) {
                Some(cast) => *value = cast,
                None => errors.push(FieldError::new(
                    name.clone(),
                    format!(
                        "Cast to {} failed for value {} at path \"{}\"",
                        def.field_type.type_name(),
                        value,
                        name
                    ),
                )),
            }
        }

        errors
    }
}

fn finish(document: Document, errors: Vec<FieldError>) -> SchemaResult<Document> {
    if errors.is_empty() {
        Ok(document)
    } else {
        Err(SchemaError::Validation { errors })
    }
}

/// Cast a value to `field_type`; `None` when it cannot be represented
fn cast_value(field_type: &FieldType, value: &Value) -> Option<Value> {
    match (field_type, value) {
        (FieldType::String, Value::String(_)) => Some(value.clone()),
        (FieldType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (FieldType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

        (FieldType::Number, Value::Number(_)) => Some(value.clone()),
        (FieldType::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(number_value),

        (FieldType::Bool, Value::Bool(_)) => Some(value.clone()),
        (FieldType::Bool, Value::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (FieldType::Date, Value::String(s)) => DateTime::parse_from_rfc3339(s).ok().map(|d| {
            Value::String(
                d.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            )
        }),

        (FieldType::Reference, Value::String(s)) => {
            DocumentId::parse(s).map(|id| Value::String(id.to_string()))
        }

        (FieldType::Object, Value::Object(_)) => Some(value.clone()),

        (FieldType::Array(element), Value::Array(items)) => items
            .iter()
            .map(|item| cast_value(element, item))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        // A scalar where an array is expected becomes a one-element array
        (FieldType::Array(element), scalar) => {
            cast_value(element, scalar).map(|v| Value::Array(vec![v]))
        }

        _ => None,
    }
}

/// Keep integral values as integers so they render without a fraction
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// Check one field's constraints against an already-cast value
fn check_field(name: &str, def: &FieldDef, value: Option<&Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let missing = match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    };
    if missing {
        if let Some(message) = &def.required {
            errors.push(FieldError::new(name, message.clone()));
        }
        return errors;
    }
    let Some(value) = value else {
        return errors;
    };

    let strings: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    if let Some(rule) = &def.allowed {
        if strings.iter().any(|s| !rule.value.iter().any(|a| a == s)) {
            errors.push(FieldError::new(name, rule.message.clone()));
        }
    }

    if let Some(rule) = &def.max_length {
        if strings.iter().any(|s| s.chars().count() > rule.value) {
            errors.push(FieldError::new(name, rule.message.clone()));
        }
    }

    if let Some(rule) = &def.pattern {
        if strings.iter().any(|s| !rule.value.is_match(s)) {
            errors.push(FieldError::new(name, rule.message.clone()));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(rule) = &def.min {
            if n < rule.value {
                errors.push(FieldError::new(name, rule.message.clone()));
            }
        }
        if let Some(rule) = &def.max {
            if n > rule.value {
                errors.push(FieldError::new(name, rule.message.clone()));
            }
        }
    }

    errors
}
