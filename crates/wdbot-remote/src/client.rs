//! Wikibase action API client

use crate::config::WikibaseConfig;
use crate::wire;
use crate::{build_agent, remote_error};
use serde_json::Value as Json;
use std::cell::RefCell;
use wdbot_core::{Claim, ItemId, Result, WdbotError};
use wdbot_model::{ItemData, ItemDraft, Store};

/// [`Store`] backed by the `api.php` endpoint of a Wikibase installation
pub struct WikibaseClient {
    agent: ureq::Agent,
    api_url: String,
    user_agent: String,
    access_token: Option<String>,
    csrf_token: RefCell<Option<String>>,
}

impl WikibaseClient {
    pub fn from_config(config: &WikibaseConfig) -> Self {
        Self {
            agent: build_agent(config.timeout_secs()),
            api_url: config.api_url().to_string(),
            user_agent: config.user_agent(),
            access_token: config.access_token.clone(),
            csrf_token: RefCell::new(None),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn read(&self, action: &str, params: &[(&str, &str)]) -> Result<Json> {
        let mut request = self
            .agent
            .get(&self.api_url)
            .header("User-Agent", &self.user_agent)
            .query("action", action)
            .query("format", "json");
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        for (key, value) in params {
            request = request.query(*key, *value);
        }

        let response = match request.call() {
            Ok(mut ok) => ok
                .body_mut()
                .read_json::<Json>()
                .map_err(|e| WdbotError::Wire(format!("Failed to parse {} response: {}", action, e)))?,
            Err(e) => return Err(remote_error(action, e)),
        };
        wire::check_api_error(&response)?;
        Ok(response)
    }

    fn write(&self, action: &str, params: &[(&str, &str)]) -> Result<Json> {
        let token = self.csrf_token()?;
        let mut form: Vec<(&str, &str)> = vec![
            ("action", action),
            ("format", "json"),
            ("bot", "1"),
            ("token", token.as_str()),
        ];
        form.extend_from_slice(params);

        let mut request = self
            .agent
            .post(&self.api_url)
            .header("User-Agent", &self.user_agent);
        if let Some(access) = &self.access_token {
            request = request.header("Authorization", &format!("Bearer {}", access));
        }

        let response = match request.send_form(form) {
            Ok(mut ok) => ok
                .body_mut()
                .read_json::<Json>()
                .map_err(|e| WdbotError::Wire(format!("Failed to parse {} response: {}", action, e)))?,
            Err(e) => return Err(remote_error(action, e)),
        };
        wire::check_api_error(&response)?;
        Ok(response)
    }

    /// Edit token, fetched on first write and reused afterwards
    fn csrf_token(&self) -> Result<String> {
        if let Some(token) = self.csrf_token.borrow().as_ref() {
            return Ok(token.clone());
        }
        if self.access_token.is_none() {
            tracing::warn!("no access token configured, edits will be anonymous");
        }
        let response = self.read("query", &[("meta", "tokens"), ("type", "csrf")])?;
        let token = parse_csrf_token(&response)?;
        *self.csrf_token.borrow_mut() = Some(token.clone());
        Ok(token)
    }
}

/// Extract the edit token from a `meta=tokens` response
pub fn parse_csrf_token(response: &Json) -> Result<String> {
    response["query"]["tokens"]["csrftoken"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| WdbotError::Wire("token response has no csrftoken".to_string()))
}

impl Store for WikibaseClient {
    fn get(&self, id: ItemId) -> Result<ItemData> {
        let ids = id.to_string();
        let response = self.read(
            "wbgetentities",
            &[("ids", ids.as_str()), ("props", "labels|descriptions|claims")],
        )?;
        wire::parse_entity(&response, id)
    }

    fn add_claim(&self, id: ItemId, claim: &Claim, summary: &str) -> Result<()> {
        let guid = wire::new_guid(id);
        let body = wire::claim_json(claim, &guid)?.to_string();
        tracing::debug!(target_item = %id, guid = guid.as_str(), "wbsetclaim");
        self.write("wbsetclaim", &[("claim", body.as_str()), ("summary", summary)])?;
        Ok(())
    }

    fn set_label(&self, id: ItemId, language: &str, text: &str) -> Result<()> {
        let ids = id.to_string();
        self.write(
            "wbsetlabel",
            &[("id", ids.as_str()), ("language", language), ("value", text)],
        )?;
        Ok(())
    }

    fn set_description(&self, id: ItemId, language: &str, text: &str) -> Result<()> {
        let ids = id.to_string();
        self.write(
            "wbsetdescription",
            &[("id", ids.as_str()), ("language", language), ("value", text)],
        )?;
        Ok(())
    }

    fn create_item(&self, draft: &ItemDraft, summary: &str) -> Result<ItemId> {
        let data = wire::item_json(draft)?.to_string();
        let response = self.write(
            "wbeditentity",
            &[("new", "item"), ("data", data.as_str()), ("summary", summary)],
        )?;
        let id = wire::parse_created_id(&response)?;
        tracing::info!(created = %id, "wbeditentity");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_csrf_token() {
        let response = json!({ "batchcomplete": "", "query": { "tokens": { "csrftoken": "abc+\\" } } });
        assert_eq!(parse_csrf_token(&response).unwrap(), "abc+\\");
    }

    #[test]
    fn test_missing_csrf_token_is_wire_error() {
        let response = json!({ "query": {} });
        assert!(matches!(parse_csrf_token(&response), Err(WdbotError::Wire(_))));
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let client = WikibaseClient::from_config(&WikibaseConfig::default());
        assert_eq!(client.api_url(), crate::config::DEFAULT_API_URL);
        assert!(client.csrf_token.borrow().is_none());
    }
}
