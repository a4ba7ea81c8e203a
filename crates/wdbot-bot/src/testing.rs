//! Fixtures shared by the unit tests in this crate

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use wdbot_constraint::{ConstraintRegistry, ConstraintSet, Operator, SourceCatalog};
use wdbot_core::properties::{
    instance, COUNTRY_OF_ORIGIN, INSTANCE_OF, PART_OF_THE_SERIES, SEASON, SERIES_ORDINAL, TITLE,
};
use wdbot_core::{Claim, ItemId, Result, Value};
use wdbot_model::memory::MemoryRepo;
use wdbot_model::ItemData;

pub const SERIES: ItemId = ItemId::from_raw(100);
pub const SEASON_1: ItemId = ItemId::from_raw(200);
pub const EPISODE_1: ItemId = ItemId::from_raw(201);
pub const EPISODE_2: ItemId = ItemId::from_raw(202);
pub const EPISODE_3: ItemId = ItemId::from_raw(203);

const RULES: &str = r#"
[[rule]]
applies_to = ["episode"]

[rule.kind]
type = "has_property"
properties = ["P31"]

[[rule]]
applies_to = ["episode"]

[rule.kind]
type = "follows_something"

[[rule]]
applies_to = ["episode"]

[rule.kind]
type = "has_english_label"

[[rule]]
applies_to = ["episode"]

[rule.kind]
type = "inherits_property"
properties = ["P495"]
"#;

pub fn constraints() -> ConstraintSet {
    let mut registry = ConstraintRegistry::new();
    registry.load_string(RULES).unwrap();
    registry.build(&SourceCatalog::new())
}

fn episode(id: ItemId, ordinal: u32) -> ItemData {
    ItemData::new(id)
        .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE))
        .with_claim(
            Claim::new(SEASON.id, Value::Item(SEASON_1))
                .with_qualifier(SERIES_ORDINAL.id, Value::String(ordinal.to_string())),
        )
}

/// One season of three episodes.
///
/// Episode 1 is complete apart from its (unresolvable) predecessor. Episodes
/// 2 and 3 lack a follows claim and the country of origin; episode 2 also
/// lacks a label but has a title.
pub fn show() -> Arc<MemoryRepo> {
    let mem = MemoryRepo::new();
    mem.insert(
        ItemData::new(SERIES)
            .with_label("en", "Lost")
            .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES))
            .with(COUNTRY_OF_ORIGIN.id, Value::Item(ItemId::from_raw(30))),
    );
    mem.insert(
        ItemData::new(SEASON_1)
            .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_SEASON))
            .with(PART_OF_THE_SERIES.id, Value::Item(SERIES))
            .with(COUNTRY_OF_ORIGIN.id, Value::Item(ItemId::from_raw(30))),
    );
    mem.insert(
        episode(EPISODE_1, 1)
            .with_label("en", "Pilot")
            .with(COUNTRY_OF_ORIGIN.id, Value::Item(ItemId::from_raw(30))),
    );
    mem.insert(episode(EPISODE_2, 2).with(TITLE.id, Value::text("Tabula Rasa", "en")));
    mem.insert(episode(EPISODE_3, 3).with_label("en", "Walkabout"));
    mem
}

/// What an operator was asked and shown
#[derive(Debug, Default)]
pub struct Transcript {
    pub prompts: Vec<String>,
    pub shown: Vec<String>,
}

/// Operator with a fixed answer that records into a shared transcript
pub struct RecordingOperator {
    answer: bool,
    transcript: Rc<RefCell<Transcript>>,
}

impl RecordingOperator {
    pub fn new(answer: bool) -> (Box<dyn Operator>, Rc<RefCell<Transcript>>) {
        let transcript = Rc::new(RefCell::new(Transcript::default()));
        let operator = Self {
            answer,
            transcript: transcript.clone(),
        };
        (Box::new(operator), transcript)
    }
}

impl Operator for RecordingOperator {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.transcript.borrow_mut().prompts.push(prompt.to_string());
        Ok(self.answer)
    }

    fn show(&mut self, message: &str) {
        self.transcript.borrow_mut().shown.push(message.to_string());
    }
}
