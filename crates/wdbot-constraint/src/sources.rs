//! External identifier sources used to look up titles and counts

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use wdbot_core::{Property, Result};
use wdbot_model::Entity;

/// A third-party database keyed by an external identifier.
///
/// "Not found" is reported as `Ok(None)`, never as an error.
pub trait ExternalLookup {
    fn name(&self) -> &str;

    fn title(&self, identifier: &str) -> Result<Option<String>>;

    fn episode_count(&self, _identifier: &str) -> Result<Option<u64>> {
        Ok(None)
    }
}

/// A lookup paired with the property holding its identifier on an item
#[derive(Clone)]
pub struct ExternalSource {
    pub property: Property,
    pub lookup: Arc<dyn ExternalLookup>,
}

impl ExternalSource {
    pub fn new(property: Property, lookup: Arc<dyn ExternalLookup>) -> Self {
        Self { property, lookup }
    }

    pub fn name(&self) -> &str {
        self.lookup.name()
    }

    /// The entity's identifier in this source, if recorded
    pub fn identifier<'a>(&self, entity: &'a Entity) -> Option<&'a str> {
        entity
            .first_claim(self.property.id)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Title of the entity in this source. Blank titles count as missing.
    pub fn title_for(&self, entity: &Entity) -> Result<Option<String>> {
        let Some(identifier) = self.identifier(entity) else {
            tracing::debug!(source = self.name(), id = %entity.id(), "no identifier, skipping source");
            return Ok(None);
        };
        let title = self
            .lookup
            .title(identifier)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(title) = &title {
            tracing::info!(source = self.name(), identifier, title = title.as_str(), "fetched title");
        }
        Ok(title)
    }

    pub fn episode_count_for(&self, entity: &Entity) -> Result<Option<u64>> {
        match self.identifier(entity) {
            Some(identifier) => self.lookup.episode_count(identifier),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for ExternalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalSource")
            .field("name", &self.name())
            .field("property", &self.property.id)
            .finish()
    }
}

/// Sources consulted in order, first hit wins
#[derive(Debug, Clone, Default)]
pub struct Sources(Vec<ExternalSource>);

impl Sources {
    pub fn new(sources: Vec<ExternalSource>) -> Self {
        Self(sources)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalSource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(ExternalSource::name).collect()
    }

    /// First non-empty title across the sources
    pub fn first_title(&self, entity: &Entity) -> Result<Option<String>> {
        for source in &self.0 {
            if let Some(title) = source.title_for(entity)? {
                return Ok(Some(title));
            }
        }
        Ok(None)
    }
}

/// Named sources available to the rule registry
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: BTreeMap<String, ExternalSource>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, source: ExternalSource) {
        self.sources.insert(name.into(), source);
    }

    pub fn get(&self, name: &str) -> Option<&ExternalSource> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Resolve names in order; unknown names are skipped with a warning
    pub fn select(&self, names: &[String]) -> Sources {
        let sources = names
            .iter()
            .filter_map(|name| {
                let found = self.get(name).cloned();
                if found.is_none() {
                    tracing::warn!(source = name.as_str(), "unknown source in rule definition, skipping");
                }
                found
            })
            .collect();
        Sources::new(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLookup;
    use wdbot_core::properties::{IMDB_ID, TV_COM_ID};
    use wdbot_core::{ItemId, Value};
    use wdbot_model::memory::MemoryRepo;
    use wdbot_model::ItemData;

    #[test]
    fn test_title_skips_source_without_identifier() {
        let mem = MemoryRepo::new();
        mem.insert(
            ItemData::new(ItemId::from_raw(1)).with(TV_COM_ID.id, Value::String("lost-1".into())),
        );
        let entity = Entity::load(&mem.repo(), ItemId::from_raw(1)).unwrap();

        let imdb = Arc::new(FakeLookup::new("imdb").with_title("tt1", "Wrong"));
        let tv_com = Arc::new(FakeLookup::new("tv_com").with_title("lost-1", "Pilot"));
        let sources = Sources::new(vec![
            ExternalSource::new(IMDB_ID, imdb.clone()),
            ExternalSource::new(TV_COM_ID, tv_com.clone()),
        ]);

        assert_eq!(sources.first_title(&entity).unwrap().as_deref(), Some("Pilot"));
        assert_eq!(imdb.calls(), 0);
        assert_eq!(tv_com.calls(), 1);
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let mem = MemoryRepo::new();
        mem.insert(
            ItemData::new(ItemId::from_raw(1)).with(IMDB_ID.id, Value::String("tt1".into())),
        );
        let entity = Entity::load(&mem.repo(), ItemId::from_raw(1)).unwrap();
        let source = ExternalSource::new(
            IMDB_ID,
            Arc::new(FakeLookup::new("imdb").with_title("tt1", "  ")),
        );
        assert_eq!(source.title_for(&entity).unwrap(), None);
    }

    #[test]
    fn test_catalog_select_keeps_order_and_drops_unknown() {
        let mut catalog = SourceCatalog::new();
        catalog.register("imdb", ExternalSource::new(IMDB_ID, Arc::new(FakeLookup::new("imdb"))));
        catalog.register(
            "tv_com",
            ExternalSource::new(TV_COM_ID, Arc::new(FakeLookup::new("tv_com"))),
        );

        let names = vec!["tv_com".to_string(), "nope".to_string(), "imdb".to_string()];
        let sources = catalog.select(&names);
        assert_eq!(sources.names(), vec!["tv_com", "imdb"]);
    }
}
