//! Rule registry for loading rule definitions and building constraint sets

use crate::constraint::Constraint;
use crate::external::{has_english_label, has_title, series_has_no_of_episodes};
use crate::general::{follows_something, has_property, inherits_property, is_followed_by_something};
use crate::sources::SourceCatalog;
use crate::tv::{
    episode_has_english_description, season_has_no_of_episodes_as_count_of_parts,
    season_has_parts,
};
use crate::types::{RuleDef, RuleFile, RuleKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use wdbot_core::properties::lookup;
use wdbot_core::{Result, WdbotError};
use wdbot_model::EntityKind;

/// The built-in rule table
pub const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

/// Registry that holds all loaded rule definitions
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    rules: Vec<RuleDef>,
}

impl ConstraintRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in rule table
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.load_string(DEFAULT_RULES)?;
        Ok(registry)
    }

    /// Load rules from a TOML file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.load_string(&content)
    }

    /// Load rules from a TOML string
    pub fn load_string(&mut self, content: &str) -> Result<()> {
        let file: RuleFile = toml::from_str(content).map_err(|e| {
            WdbotError::RuleLoadError(format!("Failed to parse rule TOML: {}", e))
        })?;
        self.rules.extend(file.rule);
        Ok(())
    }

    /// Register a rule directly
    pub fn register(&mut self, rule: RuleDef) {
        self.rules.push(rule);
    }

    pub fn all(&self) -> &[RuleDef] {
        &self.rules
    }

    /// Rules that apply to an entity kind, in definition order
    pub fn for_kind(&self, kind: EntityKind) -> Vec<&RuleDef> {
        self.rules
            .iter()
            .filter(|r| r.applies_to.contains(&kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Expand every definition into constraints, grouped by entity kind.
    ///
    /// Source names are resolved against `catalog`; unknown names are dropped
    /// with a warning and the remaining sources keep their order.
    pub fn build(&self, catalog: &SourceCatalog) -> ConstraintSet {
        let mut set = ConstraintSet::default();
        for rule in &self.rules {
            let constraints = expand(&rule.kind, catalog);
            for kind in &rule.applies_to {
                set.by_kind
                    .entry(*kind)
                    .or_default()
                    .extend(constraints.iter().cloned());
            }
        }
        set
    }
}

fn expand(kind: &RuleKind, catalog: &SourceCatalog) -> Vec<Constraint> {
    match kind {
        RuleKind::HasProperty { properties } => properties
            .iter()
            .map(|p| has_property(lookup(*p)))
            .collect(),
        RuleKind::InheritsProperty { properties } => properties
            .iter()
            .map(|p| inherits_property(lookup(*p)))
            .collect(),
        RuleKind::FollowsSomething => vec![follows_something()],
        RuleKind::IsFollowedBySomething => vec![is_followed_by_something()],
        RuleKind::SeasonHasParts => vec![season_has_parts()],
        RuleKind::SeasonHasNoOfEpisodesAsCountOfParts => {
            vec![season_has_no_of_episodes_as_count_of_parts()]
        }
        RuleKind::HasTitle { sources } => vec![has_title(Arc::new(catalog.select(sources)))],
        RuleKind::HasEnglishLabel { sources } => {
            vec![has_english_label(Arc::new(catalog.select(sources)))]
        }
        RuleKind::EpisodeHasEnglishDescription => vec![episode_has_english_description()],
        RuleKind::SeriesHasNoOfEpisodes { sources } => {
            vec![series_has_no_of_episodes(Arc::new(catalog.select(sources)))]
        }
    }
}

/// Constraints per entity kind, ready to evaluate
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    by_kind: BTreeMap<EntityKind, Vec<Constraint>>,
}

impl ConstraintSet {
    /// Constraints for a kind, in definition order
    pub fn constraints(&self, kind: EntityKind) -> &[Constraint] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of constraints across all kinds
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the constraints `keep` accepts
    pub fn retain<F>(mut self, keep: F) -> Self
    where
        F: Fn(&Constraint) -> bool,
    {
        for constraints in self.by_kind.values_mut() {
            constraints.retain(|c| keep(c));
        }
        self
    }
}
