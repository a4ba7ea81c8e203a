//! SPARQL-backed query service

use crate::config::WikibaseConfig;
use crate::{build_agent, remote_error};
use serde::Deserialize;
use std::collections::BTreeMap;
use wdbot_core::{ItemId, Result, WdbotError};
use wdbot_model::{Pattern, QueryService};

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<BTreeMap<String, Binding>>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    value: String,
}

/// Build the query selecting every item matching all terms of `pattern`
pub fn build_query(pattern: &Pattern) -> Result<String> {
    if pattern.terms.is_empty() {
        return Err(WdbotError::Remote(
            "refusing to run a query with no terms".to_string(),
        ));
    }
    let mut terms: Vec<String> = pattern
        .terms
        .iter()
        .map(|(property, value)| format!("?item wdt:{} wd:{} .", property, value))
        .collect();
    terms.extend(
        pattern
            .present
            .iter()
            .enumerate()
            .map(|(i, property)| format!("?item wdt:{} ?v{} .", property, i)),
    );
    if let Some(language) = &pattern.missing_label {
        terms.push(format!(
            "FILTER NOT EXISTS {{ ?item rdfs:label ?label . FILTER(LANG(?label) = \"{}\") }}",
            language
        ));
    }
    Ok(format!("SELECT ?item WHERE {{ {} }}", terms.join(" ")))
}

/// Item ids bound to `?item`, sorted and deduplicated
pub fn parse_bindings(response: &serde_json::Value) -> Result<Vec<ItemId>> {
    let parsed: SparqlResponse = serde_json::from_value(response.clone())
        .map_err(|e| WdbotError::Wire(format!("unexpected SPARQL response: {}", e)))?;

    let mut ids = Vec::new();
    for binding in parsed.results.bindings {
        let Some(item) = binding.get("item") else {
            continue;
        };
        let local = item.value.rsplit('/').next().unwrap_or_default();
        match local.parse::<ItemId>() {
            Ok(id) => ids.push(id),
            Err(_) => tracing::debug!(uri = item.value.as_str(), "skipping non-item binding"),
        }
    }
    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// [`QueryService`] talking to a SPARQL endpoint such as the Wikidata Query Service
pub struct SparqlClient {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
}

impl SparqlClient {
    pub fn from_config(config: &WikibaseConfig) -> Self {
        Self {
            agent: build_agent(config.timeout_secs()),
            url: config.sparql_url().to_string(),
            user_agent: config.user_agent(),
        }
    }
}

impl QueryService for SparqlClient {
    fn find(&self, pattern: &Pattern) -> Result<Vec<ItemId>> {
        let query = build_query(pattern)?;
        tracing::debug!(pattern = %pattern, "running SPARQL query");

        let response = self
            .agent
            .get(&self.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/sparql-results+json")
            .query("query", &query)
            .query("format", "json")
            .call();

        let json: serde_json::Value = match response {
            Ok(mut ok) => ok
                .body_mut()
                .read_json()
                .map_err(|e| WdbotError::Wire(format!("Failed to parse SPARQL response: {}", e)))?,
            Err(e) => return Err(remote_error("SPARQL query", e)),
        };
        parse_bindings(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wdbot_core::properties::{instance, BOARD_GAME_GEEK_ID, INSTANCE_OF, PART_OF_THE_SERIES};

    #[test]
    fn test_build_query() {
        let pattern = Pattern::new()
            .with(PART_OF_THE_SERIES.id, ItemId::from_raw(4))
            .with(INSTANCE_OF.id, instance::TELEVISION_SERIES_SEASON);
        assert_eq!(
            build_query(&pattern).unwrap(),
            "SELECT ?item WHERE { ?item wdt:P179 wd:Q4 . ?item wdt:P31 wd:Q3464665 . }"
        );
    }

    #[test]
    fn test_build_query_with_filters() {
        let pattern = Pattern::new()
            .with(INSTANCE_OF.id, instance::BOARD_GAME)
            .having(BOARD_GAME_GEEK_ID.id)
            .without_label("en");
        assert_eq!(
            build_query(&pattern).unwrap(),
            "SELECT ?item WHERE { ?item wdt:P31 wd:Q131436 . ?item wdt:P2339 ?v0 . \
             FILTER NOT EXISTS { ?item rdfs:label ?label . FILTER(LANG(?label) = \"en\") } }"
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(build_query(&Pattern::new()).is_err());
    }

    #[test]
    fn test_parse_bindings() {
        let response = json!({
            "head": { "vars": ["item"] },
            "results": { "bindings": [
                { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/Q30" } },
                { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/Q7" } },
                { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/Q30" } },
                { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/L99" } },
                { "other": { "type": "literal", "value": "x" } }
            ] }
        });
        assert_eq!(
            parse_bindings(&response).unwrap(),
            vec![ItemId::from_raw(7), ItemId::from_raw(30)]
        );
    }

    #[test]
    fn test_malformed_response_is_wire_error() {
        assert!(matches!(
            parse_bindings(&json!({ "boolean": true })),
            Err(WdbotError::Wire(_))
        ));
    }
}
