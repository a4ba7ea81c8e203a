//! wdbot Model - Typed wrappers around knowledge-graph items
//!
//! Entities are loaded eagerly through a [`Repo`] handle, which bundles the
//! remote store and the query service. The [`Factory`] inspects an item's
//! "instance of" claims and returns the matching [`TypedEntity`] variant.
//! Parent/child and next/previous navigation are exposed through the
//! [`Hierarchical`] and [`Chainable`] capability traits.

mod board_game;
mod capability;
mod draft;
mod entity;
mod factory;
pub mod memory;
mod repo;
mod television;

pub use board_game::BoardGame;
pub use capability::{Chainable, Direction, Hierarchical, Sequence};
pub use draft::ItemDraft;
pub use entity::Entity;
pub use factory::{EntityKind, Factory, TypedEntity};
pub use repo::{ItemData, Pattern, QueryService, Repo, Store};
pub use television::{Episode, Season, Series};
