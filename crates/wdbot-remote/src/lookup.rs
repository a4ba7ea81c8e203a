//! JSON title lookups against third-party databases

use crate::config::{SourceConfig, WdbotConfig, WikibaseConfig};
use crate::{build_agent, remote_error};
use serde_json::Value as Json;
use std::sync::Arc;
use wdbot_constraint::{ExternalLookup, ExternalSource, SourceCatalog};
use wdbot_core::{properties, Result, WdbotError};

const DEFAULT_TITLE_POINTER: &str = "/title";

/// Fetches `{id}`-templated URLs and reads fields out of the JSON reply
pub struct HttpLookup {
    name: String,
    url_template: String,
    title_pointer: String,
    episode_count_pointer: Option<String>,
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpLookup {
    pub fn new(name: &str, url_template: &str, wikibase: &WikibaseConfig) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            title_pointer: DEFAULT_TITLE_POINTER.to_string(),
            episode_count_pointer: None,
            agent: build_agent(wikibase.timeout_secs()),
            user_agent: wikibase.user_agent(),
        }
    }

    pub fn title_pointer(mut self, pointer: &str) -> Self {
        self.title_pointer = pointer.to_string();
        self
    }

    pub fn episode_count_pointer(mut self, pointer: Option<&str>) -> Self {
        self.episode_count_pointer = pointer.map(str::to_string);
        self
    }

    /// The response for an identifier, `None` when the source does not know it
    fn fetch(&self, identifier: &str) -> Result<Option<Json>> {
        let Some(url) = expand_url(&self.url_template, identifier) else {
            tracing::warn!(source = self.name.as_str(), identifier, "identifier not usable in a URL, skipping");
            return Ok(None);
        };

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call();

        match response {
            Ok(mut ok) => {
                let json = ok.body_mut().read_json::<Json>().map_err(|e| {
                    WdbotError::Wire(format!("Failed to parse {} response: {}", self.name, e))
                })?;
                Ok(Some(json))
            }
            Err(ureq::Error::StatusCode(404)) => {
                tracing::debug!(source = self.name.as_str(), identifier, "not found");
                Ok(None)
            }
            Err(e) => Err(remote_error(&self.name, e)),
        }
    }
}

impl ExternalLookup for HttpLookup {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self, identifier: &str) -> Result<Option<String>> {
        Ok(self
            .fetch(identifier)?
            .and_then(|json| extract_title(&json, &self.title_pointer)))
    }

    fn episode_count(&self, identifier: &str) -> Result<Option<u64>> {
        let Some(pointer) = &self.episode_count_pointer else {
            return Ok(None);
        };
        Ok(self
            .fetch(identifier)?
            .and_then(|json| extract_count(&json, pointer)))
    }
}

/// Substitute an identifier into a URL template.
///
/// Identifiers are restricted to characters that need no escaping.
pub fn expand_url(template: &str, identifier: &str) -> Option<String> {
    let usable = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    usable.then(|| template.replace("{id}", identifier))
}

pub fn extract_title(response: &Json, pointer: &str) -> Option<String> {
    response
        .pointer(pointer)
        .and_then(Json::as_str)
        .map(str::to_string)
}

/// Counts may arrive as numbers or numeric strings
pub fn extract_count(response: &Json, pointer: &str) -> Option<u64> {
    match response.pointer(pointer)? {
        Json::Number(n) => n.as_u64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Register every enabled source that has a URL
pub fn build_catalog(config: &WdbotConfig) -> Result<SourceCatalog> {
    let mut catalog = SourceCatalog::new();
    for (name, source) in &config.sources {
        if !source.is_enabled() {
            tracing::debug!(source = name.as_str(), "source disabled");
            continue;
        }
        let Some(url) = &source.url else {
            tracing::debug!(source = name.as_str(), "source has no url, not registering");
            continue;
        };
        let property = config.source_property(name).ok_or_else(|| {
            WdbotError::ConfigError(format!("source '{}' needs a property", name))
        })?;

        let lookup = lookup_for(name, url, source, &config.wikibase);
        catalog.register(
            name.clone(),
            ExternalSource::new(properties::lookup(property), Arc::new(lookup)),
        );
    }
    Ok(catalog)
}

fn lookup_for(name: &str, url: &str, source: &SourceConfig, wikibase: &WikibaseConfig) -> HttpLookup {
    let lookup = HttpLookup::new(name, url, wikibase)
        .episode_count_pointer(source.episode_count_pointer.as_deref());
    match &source.title_pointer {
        Some(pointer) => lookup.title_pointer(pointer),
        None => lookup,
    }
}
