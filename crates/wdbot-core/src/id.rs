//! Knowledge-graph identifiers

use crate::error::{Result, WdbotError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An item identifier of the form `Q####`.
///
/// Parsing accepts a lower-case prefix but the identifier always displays
/// with an upper-case `Q`. Once constructed the value never changes.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(u64);

impl ItemId {
    /// Create an ItemId from its numeric part
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric part
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl FromStr for ItemId {
    type Err = WdbotError;

    fn from_str(s: &str) -> Result<Self> {
        parse_prefixed(s.trim(), 'Q')
            .map(Self)
            .ok_or_else(|| WdbotError::InvalidItemId(s.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = WdbotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId(Q{})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// A property identifier of the form `P####`
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(u32);

impl PropertyId {
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl FromStr for PropertyId {
    type Err = WdbotError;

    fn from_str(s: &str) -> Result<Self> {
        parse_prefixed(s.trim(), 'P')
            .and_then(|n| u32::try_from(n).ok())
            .map(Self)
            .ok_or_else(|| WdbotError::InvalidPropertyId(s.to_string()))
    }
}

impl TryFrom<String> for PropertyId {
    type Error = WdbotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PropertyId> for String {
    fn from(id: PropertyId) -> Self {
        id.to_string()
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId(P{})", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

fn parse_prefixed(s: &str, prefix: char) -> Option<u64> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if first.to_ascii_uppercase() != prefix {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse a batch of raw item identifiers, failing on the first malformed one.
///
/// Callers run this before any remote call so a typo never triggers a partial pass.
pub fn parse_item_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ItemId>> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}
