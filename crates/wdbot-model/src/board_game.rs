use crate::entity::Entity;
use crate::repo::Repo;
use std::fmt;
use wdbot_core::properties::BOARD_GAME_GEEK_ID;
use wdbot_core::{ItemId, Result};

/// A board game. Neither hierarchical nor chainable.
#[derive(Debug, Clone)]
pub struct BoardGame {
    entity: Entity,
}

impl BoardGame {
    pub fn load(repo: &Repo, id: ItemId) -> Result<Self> {
        Ok(Self::from_entity(Entity::load(repo, id)?))
    }

    pub fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn bgg_id(&self) -> Option<&str> {
        self.entity
            .first_claim(BOARD_GAME_GEEK_ID.id)
            .and_then(|v| v.as_str())
    }
}

impl fmt::Display for BoardGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.describe("BoardGame", f)
    }
}
