//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `WDBOT_API_URL`, `WDBOT_SPARQL_URL`,
//!    `WDBOT_ACCESS_TOKEN`, `WDBOT_{SOURCE}_URL`
//! 2. Project-local: `.wdbot/config.toml`
//! 3. Global: `~/.wdbot/config.toml`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wdbot_core::properties::{BOARD_GAME_GEEK_ID, IMDB_ID, TV_COM_ID};
use wdbot_core::{Property, PropertyId, Result, WdbotError};

pub const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_SPARQL_URL: &str = "https://query.wikidata.org/sparql";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sources the rule table refers to, with the property holding their identifier
const BUILTIN_SOURCES: [(&str, Property); 3] = [
    ("imdb", IMDB_ID),
    ("tv_com", TV_COM_ID),
    ("bgg", BOARD_GAME_GEEK_ID),
];

/// Connection settings for the Wikibase installation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikibaseConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub sparql_url: Option<String>,
    /// OAuth bearer token sent with every request
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl WikibaseConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn sparql_url(&self) -> &str {
        self.sparql_url.as_deref().unwrap_or(DEFAULT_SPARQL_URL)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("wdbot/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// An external title source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Property holding the source's identifier; built-in sources have one
    #[serde(default)]
    pub property: Option<PropertyId>,
    /// URL template, `{id}` is replaced by the identifier
    #[serde(default)]
    pub url: Option<String>,
    /// JSON pointer to the title in the response
    #[serde(default)]
    pub title_pointer: Option<String>,
    #[serde(default)]
    pub episode_count_pointer: Option<String>,
    /// Unset means enabled
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl SourceConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Rule table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule file used instead of the built-in table
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Sort batched fixes before applying them
    #[serde(default)]
    pub sort: Option<bool>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WdbotConfigFile {
    #[serde(default)]
    pub wikibase: WikibaseConfig,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct WdbotConfig {
    pub wikibase: WikibaseConfig,
    pub sources: BTreeMap<String, SourceConfig>,
    pub rules: RulesConfig,
}

impl WdbotConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = WdbotConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".wdbot/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);
        Ok(Self::resolve(config))
    }

    /// Load one file instead of the global and project layers. Env vars still apply.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(Self::resolve(config))
    }

    /// Property holding a source's identifier, configured or built in
    pub fn source_property(&self, name: &str) -> Option<PropertyId> {
        self.sources
            .get(name)
            .and_then(|s| s.property)
            .or_else(|| {
                BUILTIN_SOURCES
                    .iter()
                    .find(|(builtin, _)| *builtin == name)
                    .map(|(_, property)| property.id)
            })
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.sources.get(name).map_or(true, SourceConfig::is_enabled)
    }

    /// Whether batch mode sorts fixes (defaults to true)
    pub fn sort(&self) -> bool {
        self.rules.sort.unwrap_or(true)
    }

    pub fn rule_file(&self) -> Option<&Path> {
        self.rules.file.as_deref()
    }

    fn resolve(file: WdbotConfigFile) -> Self {
        Self {
            wikibase: file.wikibase,
            sources: file.sources,
            rules: file.rules,
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".wdbot").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<WdbotConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            WdbotError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut WdbotConfigFile, overlay: WdbotConfigFile) {
        let wikibase = overlay.wikibase;
        if wikibase.api_url.is_some() {
            base.wikibase.api_url = wikibase.api_url;
        }
        if wikibase.sparql_url.is_some() {
            base.wikibase.sparql_url = wikibase.sparql_url;
        }
        if wikibase.access_token.is_some() {
            base.wikibase.access_token = wikibase.access_token;
        }
        if wikibase.user_agent.is_some() {
            base.wikibase.user_agent = wikibase.user_agent;
        }
        if wikibase.timeout_secs.is_some() {
            base.wikibase.timeout_secs = wikibase.timeout_secs;
        }

        for (name, source) in overlay.sources {
            let entry = base.sources.entry(name).or_default();
            if source.property.is_some() {
                entry.property = source.property;
            }
            if source.url.is_some() {
                entry.url = source.url;
            }
            if source.title_pointer.is_some() {
                entry.title_pointer = source.title_pointer;
            }
            if source.episode_count_pointer.is_some() {
                entry.episode_count_pointer = source.episode_count_pointer;
            }
            if source.enabled.is_some() {
                entry.enabled = source.enabled;
            }
        }

        if overlay.rules.file.is_some() {
            base.rules.file = overlay.rules.file;
        }
        if overlay.rules.sort.is_some() {
            base.rules.sort = overlay.rules.sort;
        }
    }

    fn apply_env_overrides(config: &mut WdbotConfigFile) {
        if let Ok(url) = std::env::var("WDBOT_API_URL") {
            config.wikibase.api_url = Some(url);
        }
        if let Ok(url) = std::env::var("WDBOT_SPARQL_URL") {
            config.wikibase.sparql_url = Some(url);
        }
        if let Ok(token) = std::env::var("WDBOT_ACCESS_TOKEN") {
            config.wikibase.access_token = Some(token);
        }

        let mut names: Vec<String> = BUILTIN_SOURCES
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        names.extend(config.sources.keys().cloned());
        names.sort();
        names.dedup();
        for name in names {
            let env_key = format!("WDBOT_{}_URL", name.to_uppercase());
            if let Ok(url) = std::env::var(&env_key) {
                config.sources.entry(name).or_default().url = Some(url);
            }
        }
    }
}
