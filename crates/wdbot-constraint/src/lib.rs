//! wdbot Constraint - Validation and fix computation
//!
//! A [`Constraint`] pairs a validator with an optional fixer. Fixers never
//! write anything; they return [`Fix`] values that the bots apply later.
//! Rule sets are data: [`ConstraintRegistry`] reads TOML rule definitions and
//! expands them into a [`ConstraintSet`] per entity kind.

mod constraint;
mod copy;
mod external;
mod fix;
mod general;
mod registry;
mod report;
mod sources;
mod tv;
mod types;

#[cfg(test)]
mod testing;

pub use constraint::{Constraint, Rule};
pub use copy::copy_delayed;
pub use external::{has_english_label, has_title, series_has_no_of_episodes};
pub use fix::{ClaimFix, DescriptionFix, Fix, LabelFix, Operator};
pub use general::{follows_something, has_property, inherits_property, is_followed_by_something};
pub use registry::{ConstraintRegistry, ConstraintSet, DEFAULT_RULES};
pub use report::{ValidationReport, Violation};
pub use sources::{ExternalLookup, ExternalSource, SourceCatalog, Sources};
pub use tv::{
    episode_has_english_description, season_has_no_of_episodes_as_count_of_parts,
    season_has_parts,
};
pub use types::{RuleDef, RuleFile, RuleKind};
