//! wdbot Remote - HTTP adapters for a Wikibase installation
//!
//! - [`WikibaseClient`] implements the model's `Store` over the action API.
//! - [`SparqlClient`] implements `QueryService` against a SPARQL endpoint.
//! - [`HttpLookup`] fetches titles and episode counts from JSON sources.
//!
//! Everything is configured through [`WdbotConfig`]. Requests are blocking
//! and never retried.

pub mod client;
pub mod config;
pub mod lookup;
pub mod sparql;
pub mod wire;

pub use client::WikibaseClient;
pub use config::{RulesConfig, SourceConfig, WdbotConfig, WikibaseConfig};
pub use lookup::{build_catalog, HttpLookup};
pub use sparql::SparqlClient;

use std::time::Duration;

/// Shared agent construction; ureq reports non-2xx statuses as errors
pub(crate) fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build();
    config.into()
}

/// Map a transport failure onto the shared error type
pub(crate) fn remote_error(what: &str, err: ureq::Error) -> wdbot_core::WdbotError {
    match err {
        ureq::Error::StatusCode(code) => {
            wdbot_core::WdbotError::Remote(format!("{} failed with HTTP {}", what, code))
        }
        other => wdbot_core::WdbotError::Remote(format!("{} failed: {}", what, other)),
    }
}
