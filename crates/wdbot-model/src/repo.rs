//! Remote store and query service seams

use crate::draft::ItemDraft;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use wdbot_core::{Claim, ItemId, PropertyId, Result, Value};

/// The full state of an item as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct ItemData {
    pub id: ItemId,
    /// Labels keyed by language code
    pub labels: BTreeMap<String, String>,
    /// Descriptions keyed by language code
    pub descriptions: BTreeMap<String, String>,
    /// Claims keyed by property, in store order
    pub claims: BTreeMap<PropertyId, Vec<Claim>>,
}

impl ItemData {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            labels: BTreeMap::new(),
            descriptions: BTreeMap::new(),
            claims: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, language: &str, text: &str) -> Self {
        self.labels.insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_description(mut self, language: &str, text: &str) -> Self {
        self.descriptions
            .insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.push_claim(claim);
        self
    }

    /// Shorthand for an unqualified claim
    pub fn with(self, property: PropertyId, value: Value) -> Self {
        self.with_claim(Claim::new(property, value))
    }

    pub fn push_claim(&mut self, claim: Claim) {
        self.claims.entry(claim.property).or_default().push(claim);
    }
}

/// The remote store holding items
///
/// Every call is a blocking round trip. Implementations do not retry.
pub trait Store {
    /// Fetch the full current state of an item
    fn get(&self, id: ItemId) -> Result<ItemData>;

    /// Add a claim to an item, recording `summary` as the edit summary
    fn add_claim(&self, id: ItemId, claim: &Claim, summary: &str) -> Result<()>;

    fn set_label(&self, id: ItemId, language: &str, text: &str) -> Result<()>;

    fn set_description(&self, id: ItemId, language: &str, text: &str) -> Result<()>;

    /// Create a new item in one edit and return its id
    fn create_item(&self, draft: &ItemDraft, summary: &str) -> Result<ItemId>;
}

/// A conjunction of `property = item` terms, optionally narrowed by
/// properties that must be present and a language with no label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub terms: Vec<(PropertyId, ItemId)>,
    pub present: Vec<PropertyId>,
    pub missing_label: Option<String>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: PropertyId, value: ItemId) -> Self {
        self.terms.push((property, value));
        self
    }

    /// Require the property to hold any value
    pub fn having(mut self, property: PropertyId) -> Self {
        self.present.push(property);
        self
    }

    /// Require the item to have no label in `language`
    pub fn without_label(mut self, language: &str) -> Self {
        self.missing_label = Some(language.to_string());
        self
    }

    /// Whether an item satisfies every term and filter
    pub fn matches(&self, item: &ItemData) -> bool {
        let terms = self.terms.iter().all(|(property, value)| {
            item.claims
                .get(property)
                .map(|claims| claims.iter().any(|c| c.value.as_item() == Some(*value)))
                .unwrap_or(false)
        });
        let present = self
            .present
            .iter()
            .all(|property| item.claims.get(property).is_some_and(|c| !c.is_empty()));
        let unlabelled = self
            .missing_label
            .as_ref()
            .map_or(true, |language| !item.labels.contains_key(language));
        terms && present && unlabelled
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<String> = self
            .terms
            .iter()
            .map(|(p, v)| format!("{}={}", p, v))
            .collect();
        terms.extend(self.present.iter().map(|p| format!("{}=*", p)));
        if let Some(language) = &self.missing_label {
            terms.push(format!("no {} label", language));
        }
        write!(f, "{{{}}}", terms.join(", "))
    }
}

/// Pattern-based lookup of items
pub trait QueryService {
    fn find(&self, pattern: &Pattern) -> Result<Vec<ItemId>>;
}

/// Handle bundling the store and the query service.
///
/// Cloning is cheap; every entity keeps one so it can resolve its relatives.
#[derive(Clone)]
pub struct Repo {
    store: Arc<dyn Store>,
    query: Arc<dyn QueryService>,
}

impl Repo {
    pub fn new(store: Arc<dyn Store>, query: Arc<dyn QueryService>) -> Self {
        Self { store, query }
    }

    /// Build a handle from one backend that serves both roles
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: Store + QueryService + 'static,
    {
        Self {
            store: backend.clone(),
            query: backend,
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn query(&self) -> &dyn QueryService {
        self.query.as_ref()
    }
}

impl fmt::Debug for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repo").finish_non_exhaustive()
    }
}
