//! Proposed mutations and their application

use std::fmt;
use wdbot_core::{Claim, ItemId, Property, Result, Value};
use wdbot_model::Store;

/// The person (or stand-in) supervising a run.
///
/// Confirmation prompts and fix previews go through here rather than the log.
pub trait Operator {
    /// Ask a yes/no question; `false` means the fix is skipped
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Show an informational line
    fn show(&mut self, message: &str);
}

/// Add a claim to an item
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFix {
    pub target: ItemId,
    pub claim: Claim,
    pub summary: String,
}

impl ClaimFix {
    pub fn new(target: ItemId, claim: Claim, summary: impl Into<String>) -> Self {
        Self {
            target,
            claim,
            summary: summary.into(),
        }
    }

    /// An unqualified claim, summarised as "Setting P495 (country of origin) to Q30"
    pub fn set(target: ItemId, property: &Property, value: Value) -> Self {
        let summary = format!("Setting {} to {}", property, value);
        Self::new(target, Claim::new(property.id, value), summary)
    }
}

/// Set a label in one language
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFix {
    pub target: ItemId,
    pub language: String,
    pub text: String,
    pub summary: String,
}

impl LabelFix {
    pub fn new(target: ItemId, language: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            summary: format!("Setting {} label of {} to {}", language, target, text),
            target,
            language: language.to_string(),
            text,
        }
    }
}

/// Set a description in one language
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionFix {
    pub target: ItemId,
    pub language: String,
    pub text: String,
    pub summary: String,
}

impl DescriptionFix {
    pub fn new(target: ItemId, language: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            summary: format!("Setting {} description of {} to {}", language, target, text),
            target,
            language: language.to_string(),
            text,
        }
    }
}

/// A proposed, not yet committed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Fix {
    Claim(ClaimFix),
    Label(LabelFix),
    Description(DescriptionFix),
}

impl Fix {
    pub fn summary(&self) -> &str {
        match self {
            Fix::Claim(f) => &f.summary,
            Fix::Label(f) => &f.summary,
            Fix::Description(f) => &f.summary,
        }
    }

    /// The item this fix mutates
    pub fn target(&self) -> ItemId {
        match self {
            Fix::Claim(f) => f.target,
            Fix::Label(f) => f.target,
            Fix::Description(f) => f.target,
        }
    }

    /// Label and description edits always ask the operator first
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, Fix::Claim(_))
    }

    /// Commit the fix to the store.
    ///
    /// Returns `Ok(false)` when the operator declines. With `always_confirm`
    /// every fix is put to the operator, not only labels and descriptions.
    pub fn apply(
        &self,
        store: &dyn Store,
        operator: &mut dyn Operator,
        always_confirm: bool,
    ) -> Result<bool> {
        if always_confirm || self.requires_confirmation() {
            let prompt = format!("{} ({})?", self.summary(), self.target());
            if !operator.confirm(&prompt)? {
                tracing::warn!(target_item = %self.target(), summary = self.summary(), "fix declined");
                return Ok(false);
            }
        }

        self.commit(store)?;
        Ok(true)
    }

    /// Write the fix without asking anyone
    pub fn commit(&self, store: &dyn Store) -> Result<()> {
        match self {
            Fix::Claim(f) => store.add_claim(f.target, &f.claim, &f.summary)?,
            Fix::Label(f) => store.set_label(f.target, &f.language, &f.text)?,
            Fix::Description(f) => store.set_description(f.target, &f.language, &f.text)?,
        }
        tracing::info!(target_item = %self.target(), summary = self.summary(), "applied fix");
        Ok(())
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target(), self.summary())
    }
}

impl From<ClaimFix> for Fix {
    fn from(fix: ClaimFix) -> Self {
        Fix::Claim(fix)
    }
}

impl From<LabelFix> for Fix {
    fn from(fix: LabelFix) -> Self {
        Fix::Label(fix)
    }
}

impl From<DescriptionFix> for Fix {
    fn from(fix: DescriptionFix) -> Self {
        Fix::Description(fix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOperator;
    use wdbot_core::properties::COUNTRY_OF_ORIGIN;
    use wdbot_model::memory::{MemoryRepo, Mutation};
    use wdbot_model::ItemData;

    fn q(n: u64) -> ItemId {
        ItemId::from_raw(n)
    }

    #[test]
    fn test_claim_fix_summary() {
        let fix = ClaimFix::set(q(1), &COUNTRY_OF_ORIGIN, Value::Item(q(30)));
        assert_eq!(fix.summary, "Setting P495 (country of origin) to Q30");
    }

    #[test]
    fn test_claim_fix_applies_without_prompt() {
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(q(1)));
        let mut operator = ScriptedOperator::declining();

        let fix = Fix::from(ClaimFix::set(q(1), &COUNTRY_OF_ORIGIN, Value::Item(q(30))));
        assert!(fix.apply(mem.repo().store(), &mut operator, false).unwrap());
        assert!(operator.prompts.is_empty());
        assert_eq!(mem.mutations().len(), 1);
    }

    #[test]
    fn test_declined_label_is_not_written() {
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(q(1)));
        let mut operator = ScriptedOperator::declining();

        let fix = Fix::from(LabelFix::new(q(1), "en", "Pilot"));
        assert!(!fix.apply(mem.repo().store(), &mut operator, false).unwrap());
        assert_eq!(operator.prompts.len(), 1);
        assert!(mem.mutations().is_empty());
    }

    #[test]
    fn test_confirmed_description_is_written() {
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(q(1)));
        let mut operator = ScriptedOperator::approving();

        let fix = Fix::from(DescriptionFix::new(q(1), "en", "episode of Lost"));
        assert!(fix.apply(mem.repo().store(), &mut operator, false).unwrap());
        assert!(matches!(
            &mem.mutations()[0],
            Mutation::Description { text, .. } if text == "episode of Lost"
        ));
    }

    #[test]
    fn test_always_confirm_prompts_for_claims() {
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(q(1)));
        let mut operator = ScriptedOperator::declining();

        let fix = Fix::from(ClaimFix::set(q(1), &COUNTRY_OF_ORIGIN, Value::Item(q(30))));
        assert!(!fix.apply(mem.repo().store(), &mut operator, true).unwrap());
        assert!(mem.mutations().is_empty());
    }
}
