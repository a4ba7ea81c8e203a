//! The untyped entity wrapper shared by all concrete types

use crate::repo::{ItemData, Repo};
use std::collections::BTreeSet;
use std::fmt;
use wdbot_core::properties::INSTANCE_OF;
use wdbot_core::{Claim, ItemId, PropertyId, Result, Value, WdbotError};

/// Language used for labels, descriptions and titles
pub const DEFAULT_LANGUAGE: &str = "en";

/// A knowledge-graph item with its claims loaded eagerly.
///
/// The claims are a snapshot taken at construction; call [`Entity::refresh`]
/// to re-fetch them.
#[derive(Clone)]
pub struct Entity {
    data: ItemData,
    repo: Repo,
}

impl Entity {
    /// Load an item from the store. Fails if the load fails.
    pub fn load(repo: &Repo, id: ItemId) -> Result<Self> {
        let data = repo.store().get(id)?;
        Ok(Self::from_data(repo, data))
    }

    pub fn from_data(repo: &Repo, data: ItemData) -> Self {
        Self {
            data,
            repo: repo.clone(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.data.id
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    pub fn data(&self) -> &ItemData {
        &self.data
    }

    /// The English label
    pub fn label(&self) -> Option<&str> {
        self.label_in(DEFAULT_LANGUAGE)
    }

    pub fn label_in(&self, language: &str) -> Option<&str> {
        self.data.labels.get(language).map(String::as_str)
    }

    /// The English description
    pub fn description(&self) -> Option<&str> {
        self.data
            .descriptions
            .get(DEFAULT_LANGUAGE)
            .map(String::as_str)
    }

    pub fn claims(&self, property: PropertyId) -> &[Claim] {
        self.data
            .claims
            .get(&property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_claim(&self, property: PropertyId) -> bool {
        !self.claims(property).is_empty()
    }

    pub fn claim_count(&self, property: PropertyId) -> usize {
        self.claims(property).len()
    }

    /// Target of the first claim for a property
    pub fn first_claim(&self, property: PropertyId) -> Option<&Value> {
        self.claims(property).first().map(|c| &c.value)
    }

    /// Target of the first claim for a property, or `default`
    pub fn first_claim_or<'a>(&'a self, property: PropertyId, default: &'a Value) -> &'a Value {
        self.first_claim(property).unwrap_or(default)
    }

    /// The first claim for `property` whose target is `item`
    pub fn claim_targeting(&self, property: PropertyId, item: ItemId) -> Option<&Claim> {
        self.claims(property)
            .iter()
            .find(|c| c.value.as_item() == Some(item))
    }

    /// Set of target identities for a property, ignoring order and duplicates
    pub fn target_keys(&self, property: PropertyId) -> BTreeSet<String> {
        self.claims(property)
            .iter()
            .map(|c| c.value.target_key())
            .collect()
    }

    pub fn instance_ids(&self) -> BTreeSet<ItemId> {
        self.claims(INSTANCE_OF.id)
            .iter()
            .filter_map(|c| c.value.as_item())
            .collect()
    }

    /// Re-fetch every claim, label and description from the store
    pub fn refresh(&mut self) -> Result<()> {
        let fresh = self.repo.store().get(self.id())?;
        if fresh.id != self.id() {
            return Err(WdbotError::Wire(format!(
                "store returned {} when refreshing {}",
                fresh.id,
                self.id()
            )));
        }
        self.data = fresh;
        Ok(())
    }

    pub(crate) fn describe(&self, type_name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} ({}))",
            type_name,
            self.id(),
            self.label().unwrap_or("no label")
        )
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe("Entity", f)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity").field("data", &self.data).finish()
    }
}

/// Render a set of item ids for error messages
pub(crate) fn join_ids(ids: &BTreeSet<ItemId>) -> String {
    let parts: Vec<String> = ids.iter().map(ItemId::to_string).collect();
    format!("[{}]", parts.join(", "))
}
