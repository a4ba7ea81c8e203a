//! Wrappers for television series, seasons and episodes

use crate::capability::{resolve_adjacent, Chainable, Direction, Hierarchical, Sequence};
use crate::entity::{join_ids, Entity};
use crate::factory::TypedEntity;
use crate::repo::{Pattern, Repo};
use std::fmt;
use wdbot_core::properties::{instance, PART_OF_THE_SERIES, SEASON};
use wdbot_core::{ItemId, Result, WdbotError};

/// A television series episode
#[derive(Debug, Clone)]
pub struct Episode {
    entity: Entity,
}

impl Episode {
    /// Load an episode. The item's type is not checked; use the factory when unsure.
    pub fn load(repo: &Repo, id: ItemId) -> Result<Self> {
        Ok(Self::from_entity(Entity::load(repo, id)?))
    }

    pub fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn season_id(&self) -> Option<ItemId> {
        self.entity.first_claim(SEASON.id).and_then(|v| v.as_item())
    }

    pub fn series_id(&self) -> Option<ItemId> {
        self.entity
            .first_claim(PART_OF_THE_SERIES.id)
            .and_then(|v| v.as_item())
    }

    /// Position within the season, from the season claim's ordinal qualifier
    pub fn ordinal_in_season(&self) -> Option<u32> {
        self.entity.claims(SEASON.id).first()?.ordinal()
    }

    fn sequence(&self) -> Option<Sequence> {
        let kind = instance::TELEVISION_SERIES_EPISODE;
        Sequence::of(&self.entity, SEASON.id, kind)
            .or_else(|| Sequence::of(&self.entity, PART_OF_THE_SERIES.id, kind))
    }

    fn neighbour(&self, direction: Direction) -> Result<Option<TypedEntity>> {
        resolve_adjacent(&self.entity, self.sequence(), direction)?
            .map(|id| Episode::load(self.entity.repo(), id).map(TypedEntity::Episode))
            .transpose()
    }
}

impl Hierarchical for Episode {
    /// The season if recorded, otherwise the series
    fn parent(&self) -> Result<Option<TypedEntity>> {
        let repo = self.entity.repo();
        if let Some(season) = self.season_id() {
            return Season::load(repo, season).map(|s| Some(TypedEntity::Season(s)));
        }
        if let Some(series) = self.series_id() {
            return Series::load(repo, series).map(|s| Some(TypedEntity::Series(s)));
        }
        Ok(None)
    }
}

impl Chainable for Episode {
    fn next(&self) -> Result<Option<TypedEntity>> {
        self.neighbour(Direction::Next)
    }

    fn previous(&self) -> Result<Option<TypedEntity>> {
        self.neighbour(Direction::Previous)
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.describe("Episode", f)
    }
}

/// A television series season
#[derive(Debug, Clone)]
pub struct Season {
    entity: Entity,
}

impl Season {
    /// Load a season, failing fast if the item is not a season
    pub fn load(repo: &Repo, id: ItemId) -> Result<Self> {
        Self::from_entity(Entity::load(repo, id)?)
    }

    pub fn from_entity(entity: Entity) -> Result<Self> {
        let instances = entity.instance_ids();
        if !instances.contains(&instance::TELEVISION_SERIES_SEASON) {
            return Err(WdbotError::TypeMismatch {
                id: entity.id(),
                expected: "television series season".to_string(),
                found: join_ids(&instances),
            });
        }
        Ok(Self { entity })
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn series_id(&self) -> Option<ItemId> {
        self.entity
            .first_claim(PART_OF_THE_SERIES.id)
            .and_then(|v| v.as_item())
    }

    /// Position within the series, from the series claim's ordinal qualifier
    pub fn ordinal(&self) -> Option<u32> {
        self.entity.claims(PART_OF_THE_SERIES.id).first()?.ordinal()
    }

    /// Episodes whose season claim points here, as `(ordinal, episode)` pairs.
    ///
    /// Membership comes from a single query-service call. Episodes without an
    /// ordinal on that claim are left out. The result is sorted by ordinal.
    pub fn parts(&self) -> Result<Vec<(u32, Episode)>> {
        let id = self.entity.id();
        let repo = self.entity.repo();
        let members = repo.query().find(&Pattern::new().with(SEASON.id, id))?;

        let mut parts = Vec::with_capacity(members.len());
        for member in members {
            let episode = Episode::load(repo, member)?;
            match episode
                .entity()
                .claim_targeting(SEASON.id, id)
                .and_then(|c| c.ordinal())
            {
                Some(ordinal) => parts.push((ordinal, episode)),
                None => tracing::debug!(season = %id, episode = %member, "episode has no season ordinal"),
            }
        }
        parts.sort_by_key(|(ordinal, _)| *ordinal);
        Ok(parts)
    }

    fn sequence(&self) -> Option<Sequence> {
        Sequence::of(
            &self.entity,
            PART_OF_THE_SERIES.id,
            instance::TELEVISION_SERIES_SEASON,
        )
    }

    fn neighbour(&self, direction: Direction) -> Result<Option<TypedEntity>> {
        resolve_adjacent(&self.entity, self.sequence(), direction)?
            .map(|id| Season::load(self.entity.repo(), id).map(TypedEntity::Season))
            .transpose()
    }
}

impl Hierarchical for Season {
    fn parent(&self) -> Result<Option<TypedEntity>> {
        self.series_id()
            .map(|id| Series::load(self.entity.repo(), id).map(TypedEntity::Series))
            .transpose()
    }

    fn children(&self) -> Result<Vec<TypedEntity>> {
        Ok(self
            .parts()?
            .into_iter()
            .map(|(_, episode)| TypedEntity::Episode(episode))
            .collect())
    }
}

impl Chainable for Season {
    fn next(&self) -> Result<Option<TypedEntity>> {
        self.neighbour(Direction::Next)
    }

    fn previous(&self) -> Result<Option<TypedEntity>> {
        self.neighbour(Direction::Previous)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.describe("Season", f)
    }
}

/// A television series
#[derive(Debug, Clone)]
pub struct Series {
    entity: Entity,
}

impl Series {
    pub fn load(repo: &Repo, id: ItemId) -> Result<Self> {
        Ok(Self::from_entity(Entity::load(repo, id)?))
    }

    pub fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.describe("Series", f)
    }
}
