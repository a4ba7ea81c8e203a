//! Property assertions and their values

use crate::id::{ItemId, PropertyId};
use crate::properties::SERIES_ORDINAL;
use std::fmt;

/// The target of a claim or qualifier
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Reference to another item
    Item(ItemId),
    /// Plain string, including external identifiers
    String(String),
    MonolingualText { text: String, language: String },
    Quantity(f64),
    /// Timestamp in the store's `+YYYY-MM-DDT00:00:00Z` form
    Time { time: String, precision: u8 },
    /// A value this crate does not model (coordinates, "no value", ...)
    Other(String),
}

impl Value {
    pub fn text(text: impl Into<String>, language: impl Into<String>) -> Self {
        Value::MonolingualText {
            text: text.into(),
            language: language.into(),
        }
    }

    pub fn as_item(&self) -> Option<ItemId> {
        match self {
            Value::Item(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::MonolingualText { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<f64> {
        match self {
            Value::Quantity(q) => Some(*q),
            _ => None,
        }
    }

    /// Interpret the value as a positive ordinal (`"3"` or a whole quantity)
    pub fn as_ordinal(&self) -> Option<u32> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Quantity(q) if q.fract() == 0.0 && *q >= 0.0 => Some(*q as u32),
            _ => None,
        }
    }

    /// False for values the store can report but not accept back, like "no value"
    pub fn is_writable(&self) -> bool {
        !matches!(self, Value::Other(_))
    }

    /// Identity used when comparing value sets across items
    pub fn target_key(&self) -> String {
        match self {
            Value::Item(id) => id.to_string(),
            Value::MonolingualText { text, language } => format!("{language}:{text}"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Item(id) => write!(f, "{}", id),
            Value::String(s) => write!(f, "{}", s),
            Value::MonolingualText { text, .. } => write!(f, "{}", text),
            Value::Quantity(q) => write!(f, "{}", q),
            Value::Time { time, .. } => write!(f, "{}", time),
            Value::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Auxiliary data attached to a claim
#[derive(Debug, Clone, PartialEq)]
pub struct Qualifier {
    pub property: PropertyId,
    pub value: Value,
}

/// A property assertion on an item
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub property: PropertyId,
    pub value: Value,
    pub qualifiers: Vec<Qualifier>,
}

impl Claim {
    pub fn new(property: PropertyId, value: Value) -> Self {
        Self {
            property,
            value,
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, property: PropertyId, value: Value) -> Self {
        self.qualifiers.push(Qualifier { property, value });
        self
    }

    /// First qualifier value for a property
    pub fn qualifier(&self, property: PropertyId) -> Option<&Value> {
        self.qualifiers
            .iter()
            .find(|q| q.property == property)
            .map(|q| &q.value)
    }

    /// The series-ordinal qualifier, if present and numeric
    pub fn ordinal(&self) -> Option<u32> {
        self.qualifier(SERIES_ORDINAL.id).and_then(Value::as_ordinal)
    }
}
