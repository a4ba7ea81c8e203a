//! In-memory repository for tests and offline runs
//!
//! Serves both the [`Store`] and [`QueryService`] roles without any network
//! calls and records every mutation in the order it was made.

use crate::draft::ItemDraft;
use crate::repo::{ItemData, Pattern, QueryService, Repo, Store};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Arc;
use wdbot_core::{Claim, ItemId, Result, WdbotError};

/// A mutation applied to the in-memory store
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Claim {
        id: ItemId,
        claim: Claim,
        summary: String,
    },
    Label {
        id: ItemId,
        language: String,
        text: String,
    },
    Description {
        id: ItemId,
        language: String,
        text: String,
    },
    Create {
        id: ItemId,
        draft: ItemDraft,
        summary: String,
    },
}

#[derive(Default)]
pub struct MemoryRepo {
    items: RefCell<BTreeMap<ItemId, ItemData>>,
    mutations: RefCell<Vec<Mutation>>,
    loads: Cell<usize>,
    queries: Cell<usize>,
}

impl MemoryRepo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A [`Repo`] handle backed by this store
    pub fn repo(self: &Arc<Self>) -> Repo {
        Repo::from_shared(self.clone())
    }

    pub fn insert(&self, item: ItemData) {
        self.items.borrow_mut().insert(item.id, item);
    }

    /// Current state of an item, bypassing the load counter
    pub fn item(&self, id: ItemId) -> Option<ItemData> {
        self.items.borrow().get(&id).cloned()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }

    /// Number of `get` calls served
    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    /// Number of `find` calls served
    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    fn with_item<F>(&self, id: ItemId, f: F) -> Result<()>
    where
        F: FnOnce(&mut ItemData),
    {
        let mut items = self.items.borrow_mut();
        let item = items.get_mut(&id).ok_or(WdbotError::ItemNotFound(id))?;
        f(item);
        Ok(())
    }
}

impl Store for MemoryRepo {
    fn get(&self, id: ItemId) -> Result<ItemData> {
        self.loads.set(self.loads.get() + 1);
        self.items
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(WdbotError::ItemNotFound(id))
    }

    fn add_claim(&self, id: ItemId, claim: &Claim, summary: &str) -> Result<()> {
        self.with_item(id, |item| item.push_claim(claim.clone()))?;
        self.mutations.borrow_mut().push(Mutation::Claim {
            id,
            claim: claim.clone(),
            summary: summary.to_string(),
        });
        Ok(())
    }

    fn set_label(&self, id: ItemId, language: &str, text: &str) -> Result<()> {
        self.with_item(id, |item| {
            item.labels.insert(language.to_string(), text.to_string());
        })?;
        self.mutations.borrow_mut().push(Mutation::Label {
            id,
            language: language.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_description(&self, id: ItemId, language: &str, text: &str) -> Result<()> {
        self.with_item(id, |item| {
            item.descriptions
                .insert(language.to_string(), text.to_string());
        })?;
        self.mutations.borrow_mut().push(Mutation::Description {
            id,
            language: language.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    /// New items take the next id after the highest one held
    fn create_item(&self, draft: &ItemDraft, summary: &str) -> Result<ItemId> {
        let id = {
            let items = self.items.borrow();
            let last = items.keys().next_back().map_or(0, |id| id.raw());
            ItemId::from_raw(last + 1)
        };
        let mut item = ItemData::new(id);
        item.labels = draft.labels.clone();
        item.descriptions = draft.descriptions.clone();
        for claim in &draft.claims {
            item.push_claim(claim.clone());
        }
        self.insert(item);
        self.mutations.borrow_mut().push(Mutation::Create {
            id,
            draft: draft.clone(),
            summary: summary.to_string(),
        });
        Ok(id)
    }
}

impl QueryService for MemoryRepo {
    fn find(&self, pattern: &Pattern) -> Result<Vec<ItemId>> {
        self.queries.set(self.queries.get() + 1);
        if pattern.terms.is_empty() {
            return Err(WdbotError::Remote("refusing to run an empty pattern".into()));
        }
        Ok(self
            .items
            .borrow()
            .values()
            .filter(|item| pattern.matches(item))
            .map(|item| item.id)
            .collect())
    }
}
