//! Rule definition types, as read from TOML

use serde::{Deserialize, Serialize};
use wdbot_core::PropertyId;
use wdbot_model::EntityKind;

/// The kind of rule and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// One `has_property` constraint per listed property
    HasProperty { properties: Vec<PropertyId> },
    /// One `inherits_property` constraint per listed property
    InheritsProperty { properties: Vec<PropertyId> },
    FollowsSomething,
    IsFollowedBySomething,
    SeasonHasParts,
    SeasonHasNoOfEpisodesAsCountOfParts,
    /// Title lookup through the named sources, in order
    HasTitle { sources: Vec<String> },
    HasEnglishLabel {
        #[serde(default)]
        sources: Vec<String>,
    },
    EpisodeHasEnglishDescription,
    SeriesHasNoOfEpisodes { sources: Vec<String> },
}

/// A rule and the entity kinds it applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub applies_to: Vec<EntityKind>,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: RuleKind,
}

/// TOML file format for rule definitions
#[derive(Debug, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rule: Vec<RuleDef>,
}
