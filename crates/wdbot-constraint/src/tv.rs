//! Constraints specific to television seasons and episodes

use crate::constraint::{Constraint, Rule};
use crate::fix::{ClaimFix, DescriptionFix, Fix};
use wdbot_core::properties::{HAS_PART, NUMBER_OF_EPISODES, SERIES_ORDINAL, TITLE};
use wdbot_core::{Claim, Result, Value, WdbotError};
use wdbot_model::{Entity, Season, TypedEntity};

pub fn season_has_parts() -> Constraint {
    Constraint::new("season_has_parts()", Rule::SeasonHasParts)
}

/// The number of "has part" claims equals the "number of episodes" claim
pub fn season_has_no_of_episodes_as_count_of_parts() -> Constraint {
    Constraint::new(
        "season_has_no_of_episodes_as_count_of_parts()",
        Rule::SeasonEpisodeCountMatchesParts,
    )
}

/// The episode has an English description; the fixer writes one such as
/// "episode of Lost (S1 E3)"
pub fn episode_has_english_description() -> Constraint {
    Constraint::new(
        "episode_has_english_description()",
        Rule::EpisodeHasEnglishDescription,
    )
}

pub(crate) fn has_parts(entity: &TypedEntity) -> bool {
    entity.entity().has_claim(HAS_PART.id)
}

pub(crate) fn episode_count_matches_parts(entity: &TypedEntity) -> bool {
    let e = entity.entity();
    let Some(expected) = e
        .first_claim(NUMBER_OF_EPISODES.id)
        .and_then(Value::as_quantity)
    else {
        return false;
    };
    let parts = e.claim_count(HAS_PART.id);
    parts > 0 && parts as f64 == expected
}

pub(crate) fn fix_parts(entity: &TypedEntity) -> Result<Vec<Fix>> {
    let Some(season) = entity.as_season() else {
        return Ok(Vec::new());
    };

    let fixes = season
        .parts()?
        .into_iter()
        .map(|(ordinal, episode)| {
            let claim = Claim::new(HAS_PART.id, Value::Item(episode.entity().id()))
                .with_qualifier(SERIES_ORDINAL.id, Value::String(ordinal.to_string()));
            let summary = format!("Adding {} to {}", episode.entity().id(), HAS_PART);
            ClaimFix::new(season.entity().id(), claim, summary).into()
        })
        .collect();
    Ok(fixes)
}

pub(crate) fn fix_episode_description(entity: &TypedEntity) -> Result<Vec<Fix>> {
    let Some(episode) = entity.as_episode() else {
        return Ok(Vec::new());
    };
    let repo = episode.entity().repo();

    let season = match episode.season_id() {
        Some(id) => match Season::load(repo, id) {
            Ok(season) => Some(season),
            Err(WdbotError::TypeMismatch { .. }) => {
                tracing::debug!(episode = %episode, season = %id, "season claim does not point at a season");
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    let series_id = episode
        .series_id()
        .or_else(|| season.as_ref().and_then(Season::series_id));
    let series_title = match series_id {
        Some(id) => display_title(&Entity::load(repo, id)?),
        None => None,
    };
    let Some(series_title) = series_title else {
        tracing::info!(episode = %episode, "no series title, cannot describe episode");
        return Ok(Vec::new());
    };

    let text = describe_episode(
        &series_title,
        season.as_ref().and_then(Season::ordinal),
        episode.ordinal_in_season(),
    );
    Ok(vec![
        DescriptionFix::new(episode.entity().id(), "en", text).into()
    ])
}

/// Label if present, otherwise the title claim
fn display_title(entity: &Entity) -> Option<String> {
    entity
        .label()
        .or_else(|| entity.first_claim(TITLE.id).and_then(Value::as_str))
        .map(str::to_string)
}

/// Drops the most specific missing component first
fn describe_episode(series: &str, season: Option<u32>, episode: Option<u32>) -> String {
    match (season, episode) {
        (Some(s), Some(e)) => format!("episode of {} (S{} E{})", series, s, e),
        (Some(s), None) => format!("episode of {} (season {})", series, s),
        (None, _) => format!("episode of {}", series),
    }
}
