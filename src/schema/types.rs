//! Schema type definitions
//!
//! A schema is an ordered list of field definitions. Each field carries its
//! type plus the constraints checked on save: required, enumerated values,
//! length, numeric range, pattern, default, uniqueness and trimming.

use regex::Regex;
use serde_json::Value;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit floating point (integers included)
    Number,
    /// Boolean
    Bool,
    /// RFC 3339 timestamp stored as a string
    Date,
    /// Identity of a document in another collection
    Reference,
    /// Nested object, not inspected further
    Object,
    /// Homogeneous array with element type
    Array(Box<FieldType>),
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Bool => "Boolean",
            FieldType::Date => "Date",
            FieldType::Reference => "ObjectId",
            FieldType::Object => "Object",
            FieldType::Array(_) => "Array",
        }
    }
}

/// A constraint paired with the message reported when it fails
#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub value: T,
    pub message: String,
}

impl<T> Rule<T> {
    fn new(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }
}

/// Field definition
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field data type
    pub field_type: FieldType,
    /// Message reported when the field is missing; `None` = optional
    pub required: Option<String>,
    /// Allowed values (for strings and string arrays)
    pub allowed: Option<Rule<Vec<String>>>,
    /// Maximum string length, in characters
    pub max_length: Option<Rule<usize>>,
    /// Inclusive numeric bounds
    pub min: Option<Rule<f64>>,
    pub max: Option<Rule<f64>>,
    /// Pattern a string must match
    pub pattern: Option<Rule<Regex>>,
    /// Value filled in on create when the field is absent
    pub default: Option<DefaultValue>,
    /// Backed by a unique index
    pub unique: bool,
    /// Strip surrounding whitespace before validation
    pub trim: bool,
    /// Maintained by the server; dropped from client payloads
    pub internal: bool,
}

/// Default for an absent field
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A fixed value
    Fixed(Value),
    /// The current time
    Now,
}

impl FieldDef {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: None,
            allowed: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
            default: None,
            unique: false,
            trim: false,
            internal: false,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Bool)
    }

    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    pub fn reference() -> Self {
        Self::of(FieldType::Reference)
    }

    pub fn object() -> Self {
        Self::of(FieldType::Object)
    }

    pub fn array(element_type: FieldType) -> Self {
        Self::of(FieldType::Array(Box::new(element_type)))
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn one_of(mut self, values: &[&str], message: impl Into<String>) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.allowed = Some(Rule::new(values, message));
        self
    }

    pub fn max_length(mut self, length: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(Rule::new(length, message));
        self
    }

    pub fn min(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.min = Some(Rule::new(bound, message));
        self
    }

    pub fn max(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.max = Some(Rule::new(bound, message));
        self
    }

    pub fn matching(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(Rule::new(pattern, message));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Fixed(value));
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default = Some(DefaultValue::Now);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// Complete schema definition
#[derive(Debug, Clone)]
pub struct Schema {
    /// Model name used in messages (`Bootcamp`)
    pub name: String,
    /// Field definitions in declaration order
    pub fields: Vec<(String, FieldDef)>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Look up a field definition
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, def)| def)
    }

    /// Fields backed by a unique index
    pub fn unique_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.unique)
            .map(|(name, _)| name.as_str())
    }
}
