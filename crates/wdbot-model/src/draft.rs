//! Items that do not exist in the store yet
//!
//! A draft is created in one store call, or printed as a QuickStatements
//! batch for a person to review and submit.

use std::collections::BTreeMap;
use wdbot_core::{Claim, Result, Value, WdbotError};

/// Labels, descriptions and claims of an item to create
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub labels: BTreeMap<String, String>,
    pub descriptions: BTreeMap<String, String>,
    pub claims: Vec<Claim>,
}

impl ItemDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, language: &str, text: &str) -> Self {
        self.labels.insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_description(mut self, language: &str, text: &str) -> Self {
        self.descriptions
            .insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels.get(language).map(String::as_str)
    }

    pub fn description(&self, language: &str) -> Option<&str> {
        self.descriptions.get(language).map(String::as_str)
    }

    /// QuickStatements (v1, pipe separated) creating this item
    pub fn quickstatements(&self) -> Result<String> {
        let mut lines = vec!["CREATE".to_string()];
        for (language, text) in &self.labels {
            lines.push(format!("LAST|L{}|\"{}\"", language, text));
        }
        for (language, text) in &self.descriptions {
            lines.push(format!("LAST|D{}|\"{}\"", language, text));
        }
        for claim in &self.claims {
            let mut line = format!("LAST|{}|{}", claim.property, qs_value(&claim.value)?);
            for qualifier in &claim.qualifiers {
                line.push_str(&format!("|{}|{}", qualifier.property, qs_value(&qualifier.value)?));
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

fn qs_value(value: &Value) -> Result<String> {
    match value {
        Value::Item(id) => Ok(id.to_string()),
        Value::String(s) => Ok(format!("\"{}\"", s)),
        Value::MonolingualText { text, language } => Ok(format!("{}:\"{}\"", language, text)),
        Value::Quantity(q) => Ok(q.to_string()),
        Value::Time { time, precision } => Ok(format!("{}/{}", time, precision)),
        Value::Other(raw) => Err(WdbotError::Wire(format!(
            "no QuickStatements form for value '{}'",
            raw
        ))),
    }
}
