//! Wikibase JSON <-> model types
//!
//! Reads `wbgetentities` responses into [`ItemData`] and writes claims in the
//! shape `wbsetclaim` expects, and new items in the shape `wbeditentity` expects. Kept free of I/O so it can be tested offline.

use serde::Deserialize;
use serde_json::{json, Value as Json};
use std::collections::BTreeMap;
use wdbot_core::{Claim, ItemId, PropertyId, Qualifier, Result, Value, WdbotError};
use wdbot_model::{ItemData, ItemDraft};

const GREGORIAN: &str = "http://www.wikidata.org/entity/Q1985727";

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: BTreeMap<String, RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(default)]
    missing: Option<Json>,
    #[serde(default)]
    labels: BTreeMap<String, Term>,
    #[serde(default)]
    descriptions: BTreeMap<String, Term>,
    #[serde(default)]
    claims: BTreeMap<String, Vec<RawStatement>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawStatement {
    mainsnak: RawSnak,
    #[serde(default)]
    qualifiers: BTreeMap<String, Vec<RawSnak>>,
    #[serde(rename = "qualifiers-order", default)]
    qualifiers_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSnak {
    snaktype: String,
    property: String,
    #[serde(default)]
    datavalue: Option<Json>,
}

/// Turn an API `error` object into a `Remote` error
pub fn check_api_error(response: &Json) -> Result<()> {
    match response.get("error") {
        None => Ok(()),
        Some(raw) => {
            let err: ApiError = serde_json::from_value(raw.clone())
                .map_err(|e| WdbotError::Wire(format!("malformed error object: {}", e)))?;
            Err(WdbotError::Remote(format!("{}: {}", err.code, err.info)))
        }
    }
}

/// Parse a `wbgetentities` response for one item
pub fn parse_entity(response: &Json, id: ItemId) -> Result<ItemData> {
    check_api_error(response)?;
    let mut parsed: EntitiesResponse = serde_json::from_value(response.clone())
        .map_err(|e| WdbotError::Wire(format!("unexpected wbgetentities response: {}", e)))?;

    let key = id.to_string();
    let raw = parsed
        .entities
        .remove(&key)
        .ok_or(WdbotError::ItemNotFound(id))?;
    if raw.missing.is_some() {
        return Err(WdbotError::ItemNotFound(id));
    }

    let mut item = ItemData::new(id);
    item.labels = raw.labels.into_iter().map(|(l, t)| (l, t.value)).collect();
    item.descriptions = raw
        .descriptions
        .into_iter()
        .map(|(l, t)| (l, t.value))
        .collect();

    for (property, statements) in raw.claims {
        let property: PropertyId = property.parse()?;
        for statement in statements {
            item.push_claim(parse_statement(property, statement)?);
        }
    }
    Ok(item)
}

fn parse_statement(property: PropertyId, statement: RawStatement) -> Result<Claim> {
    let mut claim = Claim::new(property, parse_snak(&statement.mainsnak)?);

    let RawStatement {
        mut qualifiers,
        qualifiers_order,
        ..
    } = statement;
    let mut order = qualifiers_order;
    for key in qualifiers.keys() {
        if !order.contains(key) {
            order.push(key.clone());
        }
    }

    for key in order {
        let Some(snaks) = qualifiers.remove(&key) else {
            continue;
        };
        let qualifier_property: PropertyId = key.parse()?;
        for snak in &snaks {
            claim.qualifiers.push(Qualifier {
                property: qualifier_property,
                value: parse_snak(snak)?,
            });
        }
    }
    Ok(claim)
}

fn parse_snak(snak: &RawSnak) -> Result<Value> {
    if snak.snaktype != "value" {
        return Ok(Value::Other(snak.snaktype.clone()));
    }
    let datavalue = snak.datavalue.as_ref().ok_or_else(|| {
        WdbotError::Wire(format!("value snak for {} has no datavalue", snak.property))
    })?;
    parse_datavalue(datavalue)
}

fn parse_datavalue(datavalue: &Json) -> Result<Value> {
    let kind = datavalue["type"].as_str().unwrap_or_default();
    let value = &datavalue["value"];
    let malformed = || WdbotError::Wire(format!("malformed {} datavalue: {}", kind, value));

    match kind {
        "wikibase-entityid" => {
            if value["entity-type"].as_str() != Some("item") {
                return Ok(Value::Other(value.to_string()));
            }
            if let Some(id) = value["id"].as_str() {
                return Ok(Value::Item(id.parse()?));
            }
            value["numeric-id"]
                .as_u64()
                .map(|n| Value::Item(ItemId::from_raw(n)))
                .ok_or_else(malformed)
        }
        "string" => value
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(malformed),
        "monolingualtext" => match (value["text"].as_str(), value["language"].as_str()) {
            (Some(text), Some(language)) => Ok(Value::text(text, language)),
            _ => Err(malformed()),
        },
        "quantity" => value["amount"]
            .as_str()
            .and_then(|a| a.trim_start_matches('+').parse::<f64>().ok())
            .map(Value::Quantity)
            .ok_or_else(malformed),
        "time" => {
            let time = value["time"].as_str().ok_or_else(malformed)?;
            let precision = value["precision"]
                .as_u64()
                .and_then(|p| u8::try_from(p).ok())
                .ok_or_else(malformed)?;
            Ok(Value::Time {
                time: time.to_string(),
                precision,
            })
        }
        _ => Ok(Value::Other(kind.to_string())),
    }
}

/// A fresh statement GUID for `subject`
pub fn new_guid(subject: ItemId) -> String {
    format!("{}${}", subject, uuid::Uuid::new_v4())
}

/// Serialize a claim for `wbsetclaim`
pub fn claim_json(claim: &Claim, guid: &str) -> Result<Json> {
    let mut statement = statement_json(claim)?;
    statement["id"] = json!(guid);
    Ok(statement)
}

/// Serialize a draft as the `data` of a `wbeditentity` call with `new=item`
pub fn item_json(draft: &ItemDraft) -> Result<Json> {
    let terms = |terms: &BTreeMap<String, String>| -> Json {
        terms
            .iter()
            .map(|(language, value)| {
                (
                    language.clone(),
                    json!({ "language": language, "value": value }),
                )
            })
            .collect::<serde_json::Map<String, Json>>()
            .into()
    };
    let claims = draft
        .claims
        .iter()
        .map(statement_json)
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({
        "labels": terms(&draft.labels),
        "descriptions": terms(&draft.descriptions),
        "claims": claims,
    }))
}

/// The id of the item a `wbeditentity` call created
pub fn parse_created_id(response: &Json) -> Result<ItemId> {
    check_api_error(response)?;
    response["entity"]["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| WdbotError::Wire("edit response has no entity id".to_string()))
}

fn statement_json(claim: &Claim) -> Result<Json> {
    let mut qualifiers = serde_json::Map::new();
    let mut order: Vec<String> = Vec::new();
    for qualifier in &claim.qualifiers {
        let key = qualifier.property.to_string();
        let snak = snak_json(qualifier.property, &qualifier.value)?;
        if !qualifiers.contains_key(&key) {
            order.push(key.clone());
            qualifiers.insert(key.clone(), json!([]));
        }
        if let Some(Json::Array(snaks)) = qualifiers.get_mut(&key) {
            snaks.push(snak);
        }
    }

    let mut statement = json!({
        "type": "statement",
        "rank": "normal",
        "mainsnak": snak_json(claim.property, &claim.value)?,
    });
    if !qualifiers.is_empty() {
        statement["qualifiers"] = Json::Object(qualifiers);
        statement["qualifiers-order"] = json!(order);
    }
    Ok(statement)
}

fn snak_json(property: PropertyId, value: &Value) -> Result<Json> {
    let datavalue = match value {
        Value::Item(id) => json!({
            "type": "wikibase-entityid",
            "value": {
                "entity-type": "item",
                "numeric-id": id.raw(),
                "id": id.to_string(),
            },
        }),
        Value::String(s) => json!({ "type": "string", "value": s }),
        Value::MonolingualText { text, language } => json!({
            "type": "monolingualtext",
            "value": { "text": text, "language": language },
        }),
        Value::Quantity(q) => json!({
            "type": "quantity",
            "value": { "amount": format!("{:+}", q), "unit": "1" },
        }),
        Value::Time { time, precision } => json!({
            "type": "time",
            "value": {
                "time": time,
                "timezone": 0,
                "before": 0,
                "after": 0,
                "precision": precision,
                "calendarmodel": GREGORIAN,
            },
        }),
        Value::Other(raw) => {
            return Err(WdbotError::Wire(format!(
                "cannot write {} value '{}'",
                property, raw
            )))
        }
    };
    Ok(json!({
        "snaktype": "value",
        "property": property.to_string(),
        "datavalue": datavalue,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdbot_core::properties::{
        instance, FOLLOWS, HAS_PART, INSTANCE_OF, NUMBER_OF_EPISODES, SEASON, SERIES_ORDINAL,
        TITLE,
    };

    fn sample() -> Json {
        json!({
            "entities": {
                "Q42": {
                    "id": "Q42",
                    "labels": { "en": { "language": "en", "value": "Pilot" } },
                    "descriptions": { "de": { "language": "de", "value": "Folge" } },
                    "claims": {
                        "P31": [{
                            "mainsnak": {
                                "snaktype": "value",
                                "property": "P31",
                                "datavalue": {
                                    "type": "wikibase-entityid",
                                    "value": { "entity-type": "item", "numeric-id": 21191270, "id": "Q21191270" }
                                }
                            },
                            "type": "statement",
                            "rank": "normal"
                        }],
                        "P1476": [{
                            "mainsnak": {
                                "snaktype": "value",
                                "property": "P1476",
                                "datavalue": {
                                    "type": "monolingualtext",
                                    "value": { "text": "Pilot", "language": "en" }
                                }
                            }
                        }],
                        "P1113": [{
                            "mainsnak": {
                                "snaktype": "value",
                                "property": "P1113",
                                "datavalue": { "type": "quantity", "value": { "amount": "+25", "unit": "1" } }
                            }
                        }],
                        "P4908": [{
                            "mainsnak": {
                                "snaktype": "value",
                                "property": "P4908",
                                "datavalue": {
                                    "type": "wikibase-entityid",
                                    "value": { "entity-type": "item", "numeric-id": 7 }
                                }
                            },
                            "qualifiers": {
                                "P1545": [{
                                    "snaktype": "value",
                                    "property": "P1545",
                                    "datavalue": { "type": "string", "value": "1" }
                                }]
                            },
                            "qualifiers-order": ["P1545"]
                        }],
                        "P155": [{
                            "mainsnak": { "snaktype": "novalue", "property": "P155" }
                        }]
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_entity() {
        let item = parse_entity(&sample(), ItemId::from_raw(42)).unwrap();

        assert_eq!(item.labels["en"], "Pilot");
        assert_eq!(item.descriptions["de"], "Folge");
        assert_eq!(
            item.claims[&INSTANCE_OF.id][0].value,
            Value::Item(instance::TELEVISION_SERIES_EPISODE)
        );
        assert_eq!(item.claims[&TITLE.id][0].value, Value::text("Pilot", "en"));
        assert_eq!(
            item.claims[&NUMBER_OF_EPISODES.id][0].value,
            Value::Quantity(25.0)
        );

        let season = &item.claims[&SEASON.id][0];
        assert_eq!(season.value, Value::Item(ItemId::from_raw(7)));
        assert_eq!(season.ordinal(), Some(1));
    }

    #[test]
    fn test_non_value_snak_becomes_other() {
        let item = parse_entity(&sample(), ItemId::from_raw(42)).unwrap();
        let follows = &item.claims[&FOLLOWS.id][0];
        assert_eq!(follows.value, Value::Other("novalue".to_string()));
    }

    #[test]
    fn test_missing_entity_is_not_found() {
        let response = json!({ "entities": { "Q404": { "id": "Q404", "missing": "" } } });
        assert!(matches!(
            parse_entity(&response, ItemId::from_raw(404)),
            Err(WdbotError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_api_error_is_remote_error() {
        let response = json!({ "error": { "code": "no-such-entity", "info": "Could not find an entity" } });
        match parse_entity(&response, ItemId::from_raw(1)) {
            Err(WdbotError::Remote(msg)) => assert!(msg.starts_with("no-such-entity")),
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_claim_json_with_qualifier() {
        let claim = Claim::new(HAS_PART.id, Value::Item(ItemId::from_raw(301)))
            .with_qualifier(SERIES_ORDINAL.id, Value::String("3".into()));
        let out = claim_json(&claim, "Q300$abc").unwrap();

        assert_eq!(out["id"], "Q300$abc");
        assert_eq!(out["mainsnak"]["property"], "P527");
        assert_eq!(out["mainsnak"]["datavalue"]["value"]["id"], "Q301");
        assert_eq!(out["mainsnak"]["datavalue"]["value"]["numeric-id"], 301);
        assert_eq!(out["qualifiers"]["P1545"][0]["datavalue"]["value"], "3");
        assert_eq!(out["qualifiers-order"], json!(["P1545"]));
    }

    #[test]
    fn test_quantity_amount_is_signed() {
        let claim = Claim::new(NUMBER_OF_EPISODES.id, Value::Quantity(8.0));
        let out = claim_json(&claim, "Q1$x").unwrap();
        assert_eq!(out["mainsnak"]["datavalue"]["value"]["amount"], "+8");
        assert!(out.get("qualifiers").is_none());
    }

    #[test]
    fn test_other_values_cannot_be_written() {
        let claim = Claim::new(TITLE.id, Value::Other("somevalue".into()));
        assert!(matches!(claim_json(&claim, "Q1$x"), Err(WdbotError::Wire(_))));
    }

    #[test]
    fn test_item_json_for_new_episode() {
        let draft = ItemDraft::new()
            .with_label("en", "Pilot")
            .with_claim(Claim::new(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE)))
            .with_claim(
                Claim::new(SEASON.id, Value::Item(ItemId::from_raw(300)))
                    .with_qualifier(SERIES_ORDINAL.id, Value::String("1".into())),
            );
        let out = item_json(&draft).unwrap();

        assert_eq!(out["labels"]["en"], json!({ "language": "en", "value": "Pilot" }));
        assert_eq!(out["descriptions"], json!({}));
        assert_eq!(out["claims"][0]["mainsnak"]["property"], "P31");
        assert!(out["claims"][0].get("id").is_none());
        assert_eq!(out["claims"][1]["qualifiers"]["P1545"][0]["datavalue"]["value"], "1");
    }

    #[test]
    fn test_parse_created_id() {
        let response = json!({ "success": 1, "entity": { "id": "Q4115189", "type": "item" } });
        assert_eq!(parse_created_id(&response).unwrap(), ItemId::from_raw(4115189));
        assert!(matches!(parse_created_id(&json!({ "success": 1 })), Err(WdbotError::Wire(_))));
    }

    #[test]
    fn test_guid_prefix() {
        let guid = new_guid(ItemId::from_raw(5));
        assert!(guid.starts_with("Q5$"));
        assert_eq!(guid.len(), "Q5$".len() + 36);
    }
}
