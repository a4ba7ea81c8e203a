//! Constraints applicable to any entity type

use crate::constraint::{Constraint, Rule};
use crate::copy::copy_delayed;
use crate::fix::{ClaimFix, Fix};
use wdbot_core::properties::{FOLLOWED_BY, FOLLOWS};
use wdbot_core::{Property, Result, Value};
use wdbot_model::{Direction, TypedEntity};

/// The entity has at least one value for `property`
pub fn has_property(property: Property) -> Constraint {
    Constraint::new(
        format!("has_property({})", property.name),
        Rule::HasProperty(property),
    )
}

/// The entity holds the same set of values for `property` as its parent.
///
/// What counts as the parent depends on the type: an episode inherits from
/// its season, a season from its series.
pub fn inherits_property(property: Property) -> Constraint {
    Constraint::new(
        format!("inherits_property({})", property.name),
        Rule::InheritsProperty(property),
    )
}

pub fn follows_something() -> Constraint {
    Constraint::new("follows_something()", Rule::FollowsSomething)
}

pub fn is_followed_by_something() -> Constraint {
    Constraint::new("is_followed_by_something()", Rule::IsFollowedBySomething)
}

fn parent_of(entity: &TypedEntity) -> Result<Option<TypedEntity>> {
    match entity.as_hierarchical() {
        Some(h) => h.parent(),
        None => Ok(None),
    }
}

pub(crate) fn inherits(entity: &TypedEntity, property: &Property) -> Result<bool> {
    // Having this constraint implies a parent is expected, so no parent is a failure
    let Some(parent) = parent_of(entity)? else {
        return Ok(false);
    };
    let own = entity.entity();
    let parent = parent.entity();
    if !own.has_claim(property.id) || !parent.has_claim(property.id) {
        return Ok(false);
    }
    Ok(own.target_keys(property.id) == parent.target_keys(property.id))
}

pub(crate) fn fix_inherits(entity: &TypedEntity, property: &Property) -> Result<Vec<Fix>> {
    match parent_of(entity)? {
        Some(parent) => Ok(copy_delayed(parent.entity(), entity.entity(), &[*property])),
        None => {
            tracing::info!(entity = %entity, %property, "no parent to inherit from");
            Ok(Vec::new())
        }
    }
}

pub(crate) fn has_follows(entity: &TypedEntity) -> bool {
    entity.entity().has_claim(FOLLOWS.id)
}

pub(crate) fn has_followed_by(entity: &TypedEntity) -> bool {
    entity.entity().has_claim(FOLLOWED_BY.id)
}

pub(crate) fn fix_follows(entity: &TypedEntity) -> Result<Vec<Fix>> {
    fix_neighbour(entity, Direction::Previous)
}

pub(crate) fn fix_followed_by(entity: &TypedEntity) -> Result<Vec<Fix>> {
    fix_neighbour(entity, Direction::Next)
}

fn fix_neighbour(entity: &TypedEntity, direction: Direction) -> Result<Vec<Fix>> {
    let (property, neighbour) = match (direction, entity.as_chainable()) {
        (Direction::Previous, Some(chain)) => (FOLLOWS, chain.previous()?),
        (Direction::Next, Some(chain)) => (FOLLOWED_BY, chain.next()?),
        (_, None) => return Ok(Vec::new()),
    };

    match neighbour {
        Some(neighbour) => Ok(vec![ClaimFix::set(
            entity.id(),
            &property,
            Value::Item(neighbour.id()),
        )
        .into()]),
        None => {
            tracing::info!(entity = %entity, %property, "autofix failed, neighbour not found");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{q, typed};
    use std::sync::Arc;
    use wdbot_core::properties::{
        instance, COUNTRY_OF_ORIGIN, INSTANCE_OF, PART_OF_THE_SERIES, SEASON, SERIES_ORDINAL,
    };
    use wdbot_core::Claim;
    use wdbot_model::memory::MemoryRepo;
    use wdbot_model::ItemData;

    const SERIES: u64 = 100;
    const SEASON_1: u64 = 200;

    fn episode(id: u64, ordinal: u32) -> ItemData {
        ItemData::new(q(id))
            .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE))
            .with_claim(
                Claim::new(SEASON.id, Value::Item(q(SEASON_1)))
                    .with_qualifier(SERIES_ORDINAL.id, Value::String(ordinal.to_string())),
            )
    }

    fn show() -> Arc<MemoryRepo> {
        let mem = MemoryRepo::new();
        mem.insert(
            ItemData::new(q(SERIES))
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES))
                .with(COUNTRY_OF_ORIGIN.id, Value::Item(q(30)))
                .with(COUNTRY_OF_ORIGIN.id, Value::Item(q(145))),
        );
        mem.insert(
            ItemData::new(q(SEASON_1))
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_SEASON))
                .with(PART_OF_THE_SERIES.id, Value::Item(q(SERIES)))
                .with(COUNTRY_OF_ORIGIN.id, Value::Item(q(145)))
                .with(COUNTRY_OF_ORIGIN.id, Value::Item(q(30))),
        );
        mem.insert(episode(201, 1));
        mem.insert(episode(202, 2).with(COUNTRY_OF_ORIGIN.id, Value::Item(q(30))));
        mem
    }

    #[test]
    fn test_inherits_compares_sets() {
        let mem = show();
        let season = typed(&mem, q(SEASON_1));
        assert!(inherits_property(COUNTRY_OF_ORIGIN).validate(&season).unwrap());

        let partial = typed(&mem, q(202));
        assert!(!inherits_property(COUNTRY_OF_ORIGIN).validate(&partial).unwrap());
    }

    #[test]
    fn test_inherits_without_parent_is_unsatisfied() {
        let mem = MemoryRepo::new();
        mem.insert(
            ItemData::new(q(1))
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE))
                .with(COUNTRY_OF_ORIGIN.id, Value::Item(q(30))),
        );
        let orphan = typed(&mem, q(1));

        let constraint = inherits_property(COUNTRY_OF_ORIGIN);
        assert!(!constraint.validate(&orphan).unwrap());
        assert!(constraint.fix(&orphan).unwrap().is_empty());
    }

    #[test]
    fn test_inherits_fix_copies_from_season() {
        let mem = show();
        let ep = typed(&mem, q(201));

        let fixes = inherits_property(COUNTRY_OF_ORIGIN).fix(&ep).unwrap();
        let summaries: Vec<&str> = fixes.iter().map(Fix::summary).collect();
        assert_eq!(
            summaries,
            vec![
                "Setting P495 (country of origin) to Q145",
                "Setting P495 (country of origin) to Q30",
            ]
        );
    }

    #[test]
    fn test_inherits_fix_leaves_partial_values_alone() {
        let mem = show();
        let ep = typed(&mem, q(202));
        assert!(inherits_property(COUNTRY_OF_ORIGIN).fix(&ep).unwrap().is_empty());
    }

    #[test]
    fn test_follows_fix_uses_previous_episode() {
        let mem = show();
        let second = typed(&mem, q(202));

        let constraint = follows_something();
        assert!(!constraint.validate(&second).unwrap());
        let fixes = constraint.fix(&second).unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].summary(), "Setting P155 (follows) to Q201");
        assert_eq!(fixes[0].target(), q(202));
    }

    #[test]
    fn test_followed_by_fix_is_empty_at_chain_end() {
        let mem = show();
        let last = typed(&mem, q(202));
        assert!(is_followed_by_something().fix(&last).unwrap().is_empty());
    }

    #[test]
    fn test_names() {
        assert_eq!(has_property(SEASON).name(), "has_property(season)");
        assert_eq!(
            inherits_property(COUNTRY_OF_ORIGIN).name(),
            "inherits_property(country of origin)"
        );
        assert_eq!(follows_something().name(), "follows_something()");
    }
}
