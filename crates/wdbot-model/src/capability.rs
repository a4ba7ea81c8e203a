//! Optional navigation capabilities and the shared chain resolver

use crate::entity::Entity;
use crate::factory::TypedEntity;
use crate::repo::Pattern;
use wdbot_core::properties::{FOLLOWED_BY, FOLLOWS, INSTANCE_OF};
use wdbot_core::{Claim, ItemId, PropertyId, Result};

/// An item that sits in a tree, e.g. Series > Season > Episode
pub trait Hierarchical {
    /// The enclosing item, if the relationship is recorded
    fn parent(&self) -> Result<Option<TypedEntity>>;

    /// The contained items, in ordinal order where one exists
    fn children(&self) -> Result<Vec<TypedEntity>> {
        Ok(Vec::new())
    }
}

/// An item that sits in a sequence, e.g. Season 1 <-> Season 2 <-> Season 3
pub trait Chainable {
    fn next(&self) -> Result<Option<TypedEntity>>;

    fn previous(&self) -> Result<Option<TypedEntity>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// The property on self that points in this direction
    pub fn direct_property(self) -> PropertyId {
        match self {
            Direction::Next => FOLLOWED_BY.id,
            Direction::Previous => FOLLOWS.id,
        }
    }

    /// The property a neighbour would use to point back at self
    pub fn reverse_property(self) -> PropertyId {
        match self {
            Direction::Next => FOLLOWS.id,
            Direction::Previous => FOLLOWED_BY.id,
        }
    }

    /// The neighbouring ordinal; ordinals start at 1
    pub fn step(self, ordinal: u32) -> Option<u32> {
        match self {
            Direction::Next => ordinal.checked_add(1),
            Direction::Previous => ordinal.checked_sub(1).filter(|o| *o > 0),
        }
    }
}

/// Position of an entity among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    /// Property linking siblings to their container (season or series)
    pub property: PropertyId,
    pub container: ItemId,
    /// Instance type shared by all siblings
    pub kind: ItemId,
    pub ordinal: u32,
}

impl Sequence {
    /// Read the position from the first `property` claim and its ordinal qualifier
    pub fn of(entity: &Entity, property: PropertyId, kind: ItemId) -> Option<Self> {
        let claim = entity.claims(property).first()?;
        Some(Self {
            property,
            container: claim.value.as_item()?,
            kind,
            ordinal: claim.ordinal()?,
        })
    }
}

/// Find the neighbour of `entity` in `direction`.
///
/// Strategies run in a fixed order and stop at the first hit:
/// 1. the entity's own follows/followed-by claim
/// 2. an item whose reverse claim points at the entity
/// 3. the sibling whose ordinal is exactly one away (needs `sequence`)
pub(crate) fn resolve_adjacent(
    entity: &Entity,
    sequence: Option<Sequence>,
    direction: Direction,
) -> Result<Option<ItemId>> {
    let id = entity.id();

    if let Some(direct) = entity
        .first_claim(direction.direct_property())
        .and_then(|v| v.as_item())
    {
        tracing::debug!(%id, ?direction, %direct, "resolved neighbour from direct claim");
        return Ok(Some(direct));
    }

    let reverse = Pattern::new().with(direction.reverse_property(), id);
    if let Some(found) = entity
        .repo()
        .query()
        .find(&reverse)?
        .into_iter()
        .find(|candidate| *candidate != id)
    {
        tracing::debug!(%id, ?direction, %found, "resolved neighbour from reverse lookup");
        return Ok(Some(found));
    }

    let Some(sequence) = sequence else {
        tracing::debug!(%id, ?direction, "no ordinal available, skipping ordinal lookup");
        return Ok(None);
    };
    let Some(wanted) = direction.step(sequence.ordinal) else {
        return Ok(None);
    };

    let siblings = Pattern::new()
        .with(sequence.property, sequence.container)
        .with(INSTANCE_OF.id, sequence.kind);
    for candidate in entity.repo().query().find(&siblings)? {
        if candidate == id {
            continue;
        }
        let sibling = Entity::load(entity.repo(), candidate)?;
        let ordinal = sibling
            .claim_targeting(sequence.property, sequence.container)
            .and_then(Claim::ordinal);
        if ordinal == Some(wanted) {
            tracing::debug!(%id, ?direction, %candidate, wanted, "resolved neighbour by ordinal");
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}
