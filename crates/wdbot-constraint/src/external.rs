//! Constraints whose fixers consult external identifier sources

use crate::constraint::{Constraint, Rule};
use crate::fix::{ClaimFix, Fix, LabelFix};
use crate::sources::Sources;
use std::sync::Arc;
use wdbot_core::properties::{NUMBER_OF_EPISODES, TITLE};
use wdbot_core::{Result, Value};
use wdbot_model::TypedEntity;

/// The entity has a title claim. The fixer asks each source in order.
pub fn has_title(sources: Arc<Sources>) -> Constraint {
    Constraint::new("has_title()", Rule::HasTitle(sources))
}

/// The entity has an English label.
///
/// The fixer prefers the entity's own title claim, then asks each source in
/// order. Label edits need confirmation, so this cannot run in a batch.
pub fn has_english_label(sources: Arc<Sources>) -> Constraint {
    Constraint::new("has_english_label()", Rule::HasEnglishLabel(sources))
}

pub fn series_has_no_of_episodes(sources: Arc<Sources>) -> Constraint {
    Constraint::new(
        "series_has_no_of_episodes()",
        Rule::SeriesHasNoOfEpisodes(sources),
    )
}

pub(crate) fn title_present(entity: &TypedEntity) -> bool {
    entity.entity().has_claim(TITLE.id)
}

pub(crate) fn episode_count_present(entity: &TypedEntity) -> bool {
    entity.entity().has_claim(NUMBER_OF_EPISODES.id)
}

pub(crate) fn fix_title(entity: &TypedEntity, sources: &Sources) -> Result<Vec<Fix>> {
    let Some(title) = sources.first_title(entity.entity())? else {
        tracing::info!(entity = %entity, sources = ?sources.names(), "no source knows a title");
        return Ok(Vec::new());
    };
    Ok(vec![ClaimFix::set(entity.id(), &TITLE, Value::text(title, "en")).into()])
}

pub(crate) fn fix_english_label(entity: &TypedEntity, sources: &Sources) -> Result<Vec<Fix>> {
    let own_title = entity
        .entity()
        .first_claim(TITLE.id)
        .and_then(Value::as_str)
        .map(str::to_string);
    let label = match own_title {
        Some(title) => Some(title),
        None => sources.first_title(entity.entity())?,
    };

    Ok(label
        .map(|text| LabelFix::new(entity.id(), "en", text).into())
        .into_iter()
        .collect())
}

pub(crate) fn fix_no_of_episodes(entity: &TypedEntity, sources: &Sources) -> Result<Vec<Fix>> {
    for source in sources.iter() {
        if let Some(count) = source.episode_count_for(entity.entity())? {
            tracing::info!(entity = %entity, source = source.name(), count, "fetched episode count");
            return Ok(vec![ClaimFix::set(
                entity.id(),
                &NUMBER_OF_EPISODES,
                Value::Quantity(count as f64),
            )
            .into()]);
        }
    }
    Ok(Vec::new())
}
