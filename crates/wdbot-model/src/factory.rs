//! Resolves raw identifiers to typed entity wrappers

use crate::board_game::BoardGame;
use crate::capability::{Chainable, Hierarchical};
use crate::entity::{join_ids, Entity};
use crate::repo::Repo;
use crate::television::{Episode, Season, Series};
use serde::{Deserialize, Serialize};
use std::fmt;
use wdbot_core::properties::instance;
use wdbot_core::{ItemId, Result, WdbotError};

/// The concrete kinds of entity the bots understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Episode,
    Season,
    Series,
    BoardGame,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Episode,
        EntityKind::Season,
        EntityKind::Series,
        EntityKind::BoardGame,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Episode => write!(f, "episode"),
            EntityKind::Season => write!(f, "season"),
            EntityKind::Series => write!(f, "series"),
            EntityKind::BoardGame => write!(f, "board_game"),
        }
    }
}

/// An entity resolved to its concrete type
#[derive(Debug, Clone)]
pub enum TypedEntity {
    Episode(Episode),
    Season(Season),
    Series(Series),
    BoardGame(BoardGame),
}

impl TypedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            TypedEntity::Episode(_) => EntityKind::Episode,
            TypedEntity::Season(_) => EntityKind::Season,
            TypedEntity::Series(_) => EntityKind::Series,
            TypedEntity::BoardGame(_) => EntityKind::BoardGame,
        }
    }

    pub fn entity(&self) -> &Entity {
        match self {
            TypedEntity::Episode(e) => e.entity(),
            TypedEntity::Season(s) => s.entity(),
            TypedEntity::Series(s) => s.entity(),
            TypedEntity::BoardGame(b) => b.entity(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.entity().id()
    }

    pub fn as_hierarchical(&self) -> Option<&dyn Hierarchical> {
        match self {
            TypedEntity::Episode(e) => Some(e),
            TypedEntity::Season(s) => Some(s),
            TypedEntity::Series(_) | TypedEntity::BoardGame(_) => None,
        }
    }

    pub fn as_chainable(&self) -> Option<&dyn Chainable> {
        match self {
            TypedEntity::Episode(e) => Some(e),
            TypedEntity::Season(s) => Some(s),
            TypedEntity::Series(_) | TypedEntity::BoardGame(_) => None,
        }
    }

    pub fn as_episode(&self) -> Option<&Episode> {
        match self {
            TypedEntity::Episode(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_season(&self) -> Option<&Season> {
        match self {
            TypedEntity::Season(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TypedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedEntity::Episode(e) => e.fmt(f),
            TypedEntity::Season(s) => s.fmt(f),
            TypedEntity::Series(s) => s.fmt(f),
            TypedEntity::BoardGame(b) => b.fmt(f),
        }
    }
}

/// Builds typed entities from identifiers using an explicit repository handle
#[derive(Debug, Clone)]
pub struct Factory {
    repo: Repo,
}

impl Factory {
    pub fn new(repo: Repo) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    /// Parse a raw identifier, then load and classify it.
    ///
    /// A malformed identifier is rejected before the store is contacted.
    pub fn resolve(&self, raw: &str) -> Result<TypedEntity> {
        let id: ItemId = raw.parse()?;
        self.get_typed_item(id)
    }

    pub fn get_typed_item(&self, id: ItemId) -> Result<TypedEntity> {
        Self::classify(Entity::load(&self.repo, id)?)
    }

    /// Pick the wrapper from the entity's "instance of" claims
    pub fn classify(entity: Entity) -> Result<TypedEntity> {
        let instances = entity.instance_ids();
        if instances.is_empty() {
            return Err(WdbotError::MissingInstanceOf(entity.id()));
        }

        if instances.contains(&instance::TELEVISION_SERIES_EPISODE) {
            return Ok(TypedEntity::Episode(Episode::from_entity(entity)));
        }
        if instances.contains(&instance::TELEVISION_SERIES_SEASON) {
            return Season::from_entity(entity).map(TypedEntity::Season);
        }
        if [
            instance::TELEVISION_SERIES,
            instance::ANIMATED_SERIES,
            instance::MINISERIES,
        ]
        .iter()
        .any(|kind| instances.contains(kind))
        {
            return Ok(TypedEntity::Series(Series::from_entity(entity)));
        }
        if instances.contains(&instance::BOARD_GAME) {
            return Ok(TypedEntity::BoardGame(BoardGame::from_entity(entity)));
        }

        Err(WdbotError::UnsupportedInstance {
            id: entity.id(),
            instances: join_ids(&instances),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRepo;
    use crate::repo::ItemData;
    use wdbot_core::properties::INSTANCE_OF;
    use wdbot_core::Value;

    fn item(id: u64, kind: ItemId) -> ItemData {
        ItemData::new(ItemId::from_raw(id)).with(INSTANCE_OF.id, Value::Item(kind))
    }

    #[test]
    fn test_dispatch_by_instance_of() {
        let mem = MemoryRepo::new();
        mem.insert(item(1, instance::TELEVISION_SERIES_EPISODE));
        mem.insert(item(2, instance::TELEVISION_SERIES_SEASON));
        mem.insert(item(3, instance::ANIMATED_SERIES));
        mem.insert(item(4, instance::BOARD_GAME));
        let factory = Factory::new(mem.repo());

        let kinds: Vec<EntityKind> = (1..=4)
            .map(|n| factory.get_typed_item(ItemId::from_raw(n)).unwrap().kind())
            .collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
    }

    #[test]
    fn test_capabilities_per_kind() {
        let mem = MemoryRepo::new();
        mem.insert(item(1, instance::TELEVISION_SERIES_EPISODE));
        mem.insert(item(4, instance::BOARD_GAME));
        let factory = Factory::new(mem.repo());

        let episode = factory.resolve("Q1").unwrap();
        assert!(episode.as_hierarchical().is_some());
        assert!(episode.as_chainable().is_some());

        let game = factory.resolve("Q4").unwrap();
        assert!(game.as_hierarchical().is_none());
        assert!(game.as_chainable().is_none());
    }

    #[test]
    fn test_missing_and_unsupported_instance() {
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(ItemId::from_raw(5)));
        mem.insert(item(6, ItemId::from_raw(11424)));
        let factory = Factory::new(mem.repo());

        assert!(matches!(
            factory.resolve("Q5"),
            Err(WdbotError::MissingInstanceOf(_))
        ));
        assert!(matches!(
            factory.resolve("Q6"),
            Err(WdbotError::UnsupportedInstance { .. })
        ));
    }

    #[test]
    fn test_malformed_id_never_reaches_store() {
        let mem = MemoryRepo::new();
        let factory = Factory::new(mem.repo());
        assert!(matches!(
            factory.resolve("tt0816692"),
            Err(WdbotError::InvalidItemId(_))
        ));
        assert_eq!(mem.loads(), 0);
    }

    #[test]
    fn test_entity_kind_from_toml() {
        #[derive(serde::Deserialize)]
        struct Holder {
            kinds: Vec<EntityKind>,
        }
        let holder: Holder = toml::from_str(r#"kinds = ["episode", "board_game"]"#).unwrap();
        assert_eq!(holder.kinds, vec![EntityKind::Episode, EntityKind::BoardGame]);
    }
}
