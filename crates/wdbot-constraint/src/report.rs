//! Validation report types

use crate::constraint::Constraint;
use serde::Serialize;
use wdbot_core::ItemId;
use wdbot_model::{EntityKind, TypedEntity};

/// A single failed constraint
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub constraint_name: String,
    pub has_auto_fix: bool,
}

/// The outcome of checking one entity
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub entity_id: ItemId,
    pub entity: String,
    pub kind: EntityKind,
    pub passed: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(entity: &TypedEntity, passed: &[&Constraint], failed: &[&Constraint]) -> Self {
        Self {
            entity_id: entity.id(),
            entity: entity.to_string(),
            kind: entity.kind(),
            passed: passed.iter().map(|c| c.name().to_string()).collect(),
            violations: failed
                .iter()
                .map(|c| Violation {
                    constraint_name: c.name().to_string(),
                    has_auto_fix: c.has_fixer(),
                })
                .collect(),
        }
    }

    /// True when every constraint passed
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.violations.len()
    }

    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.has_auto_fix).count()
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Found {}/{} constraint failures",
            self.violations.len(),
            self.total()
        )
    }
}
