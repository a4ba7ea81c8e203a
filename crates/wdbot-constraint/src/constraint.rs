//! Named validator/fixer pairs

use crate::fix::Fix;
use crate::sources::Sources;
use crate::{external, general, tv};
use std::fmt;
use std::sync::Arc;
use wdbot_core::{Property, Result};
use wdbot_model::TypedEntity;

/// What a constraint checks, and the data it needs to do so
#[derive(Debug, Clone)]
pub enum Rule {
    HasProperty(Property),
    InheritsProperty(Property),
    FollowsSomething,
    IsFollowedBySomething,
    SeasonHasParts,
    SeasonEpisodeCountMatchesParts,
    HasTitle(Arc<Sources>),
    HasEnglishLabel(Arc<Sources>),
    EpisodeHasEnglishDescription,
    SeriesHasNoOfEpisodes(Arc<Sources>),
}

/// A data-quality rule: a validator and an optional fixer.
///
/// A fixer only ever proposes changes to the entity under consideration,
/// never to the items it references.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    rule: Rule,
}

impl Constraint {
    pub fn new(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn has_fixer(&self) -> bool {
        !matches!(
            self.rule,
            Rule::HasProperty(_) | Rule::SeasonEpisodeCountMatchesParts
        )
    }

    /// Fixes from this constraint need an operator's approval, so they cannot
    /// be applied unattended in a batch
    pub fn requires_confirmation(&self) -> bool {
        matches!(
            self.rule,
            Rule::HasEnglishLabel(_) | Rule::EpisodeHasEnglishDescription
        )
    }

    /// Whether the entity satisfies the constraint
    pub fn validate(&self, entity: &TypedEntity) -> Result<bool> {
        let e = entity.entity();
        let satisfied = match &self.rule {
            Rule::HasProperty(p) => e.has_claim(p.id),
            Rule::InheritsProperty(p) => general::inherits(entity, p)?,
            Rule::FollowsSomething => general::has_follows(entity),
            Rule::IsFollowedBySomething => general::has_followed_by(entity),
            Rule::SeasonHasParts => tv::has_parts(entity),
            Rule::SeasonEpisodeCountMatchesParts => tv::episode_count_matches_parts(entity),
            Rule::HasTitle(_) => external::title_present(entity),
            Rule::HasEnglishLabel(_) => e.label().is_some(),
            Rule::EpisodeHasEnglishDescription => e.description().is_some(),
            Rule::SeriesHasNoOfEpisodes(_) => external::episode_count_present(entity),
        };
        tracing::debug!(
            constraint = self.name.as_str(),
            entity = %entity,
            satisfied,
            "validated"
        );
        Ok(satisfied)
    }

    /// Fixes that would make the entity satisfy the constraint.
    ///
    /// Empty when there is no fixer or no value could be resolved.
    pub fn fix(&self, entity: &TypedEntity) -> Result<Vec<Fix>> {
        match &self.rule {
            Rule::HasProperty(_) | Rule::SeasonEpisodeCountMatchesParts => {
                tracing::debug!(constraint = self.name.as_str(), entity = %entity, "no autofix available");
                Ok(Vec::new())
            }
            Rule::InheritsProperty(p) => general::fix_inherits(entity, p),
            Rule::FollowsSomething => general::fix_follows(entity),
            Rule::IsFollowedBySomething => general::fix_followed_by(entity),
            Rule::SeasonHasParts => tv::fix_parts(entity),
            Rule::HasTitle(sources) => external::fix_title(entity, sources),
            Rule::HasEnglishLabel(sources) => external::fix_english_label(entity, sources),
            Rule::EpisodeHasEnglishDescription => tv::fix_episode_description(entity),
            Rule::SeriesHasNoOfEpisodes(sources) => external::fix_no_of_episodes(entity, sources),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::has_property;
    use crate::testing::{q, typed};
    use crate::tv::season_has_no_of_episodes_as_count_of_parts;
    use wdbot_core::properties::{instance, INSTANCE_OF, TITLE};
    use wdbot_core::Value;
    use wdbot_model::memory::MemoryRepo;
    use wdbot_model::ItemData;

    #[test]
    fn test_constraints_without_fixer_return_no_fixes() {
        let mem = MemoryRepo::new();
        mem.insert(
            ItemData::new(q(1))
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_SEASON)),
        );
        let season = typed(&mem, q(1));

        for constraint in [
            has_property(TITLE),
            season_has_no_of_episodes_as_count_of_parts(),
        ] {
            assert!(!constraint.has_fixer());
            assert!(!constraint.validate(&season).unwrap());
            assert!(constraint.fix(&season).unwrap().is_empty());
        }
        assert!(mem.mutations().is_empty());
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(has_property(TITLE).to_string(), "has_property(title)");
    }
}
