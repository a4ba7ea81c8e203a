//! Test doubles shared by the unit tests in this crate

use crate::fix::Operator;
use crate::sources::ExternalLookup;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Arc;
use wdbot_core::{ItemId, Result};
use wdbot_model::memory::MemoryRepo;
use wdbot_model::{Factory, TypedEntity};

/// Lookup answering from fixed tables and counting every call
pub struct FakeLookup {
    name: String,
    titles: BTreeMap<String, String>,
    counts: BTreeMap<String, u64>,
    calls: Cell<usize>,
}

impl FakeLookup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            titles: BTreeMap::new(),
            counts: BTreeMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_title(mut self, identifier: &str, title: &str) -> Self {
        self.titles.insert(identifier.to_string(), title.to_string());
        self
    }

    pub fn with_count(mut self, identifier: &str, count: u64) -> Self {
        self.counts.insert(identifier.to_string(), count);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ExternalLookup for FakeLookup {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self, identifier: &str) -> Result<Option<String>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.titles.get(identifier).cloned())
    }

    fn episode_count(&self, identifier: &str) -> Result<Option<u64>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.counts.get(identifier).copied())
    }
}

/// Operator that gives the same answer to every prompt
pub struct ScriptedOperator {
    answer: bool,
    pub prompts: Vec<String>,
    pub shown: Vec<String>,
}

impl ScriptedOperator {
    pub fn approving() -> Self {
        Self {
            answer: true,
            prompts: Vec::new(),
            shown: Vec::new(),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::approving()
        }
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        Ok(self.answer)
    }

    fn show(&mut self, message: &str) {
        self.shown.push(message.to_string());
    }
}

pub fn q(n: u64) -> ItemId {
    ItemId::from_raw(n)
}

pub fn typed(mem: &Arc<MemoryRepo>, id: ItemId) -> TypedEntity {
    Factory::new(mem.repo()).get_typed_item(id).unwrap()
}
