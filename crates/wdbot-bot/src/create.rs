//! Creating the season and episode items of a show

use std::io::Write;
use wdbot_core::properties::{self, instance, INSTANCE_OF, PART_OF_THE_SERIES, SEASON, SERIES_ORDINAL};
use wdbot_core::{Claim, ItemId, Result, Value, WdbotError};
use wdbot_model::{Entity, ItemDraft, Store};

/// Characters that usually mean a title was copied with markup or footnotes
const SUSPICIOUS_CHARS: [char; 2] = ['[', ']'];

/// One line of a titles file: `series ordinal,season ordinal,title`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRow {
    pub series_ordinal: u32,
    pub season_ordinal: u32,
    pub title: String,
}

/// Parse a titles file. Blank lines are skipped; the title is everything
/// after the second comma, with surrounding quotes removed.
pub fn parse_titles(content: &str) -> Result<Vec<EpisodeRow>> {
    let mut rows = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, ',');
        let (Some(series), Some(season), Some(title)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(WdbotError::InvalidInput(format!(
                "line {}: expected 'series ordinal,season ordinal,title'",
                n + 1
            )));
        };
        let ordinal = |raw: &str| {
            raw.trim().parse::<u32>().map_err(|_| {
                WdbotError::InvalidInput(format!("line {}: bad ordinal '{}'", n + 1, raw.trim()))
            })
        };
        let title = title.trim();
        let title = title
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(title);
        if title.is_empty() {
            return Err(WdbotError::InvalidInput(format!("line {}: empty title", n + 1)));
        }
        rows.push(EpisodeRow {
            series_ordinal: ordinal(series)?,
            season_ordinal: ordinal(season)?,
            title: title.to_string(),
        });
    }
    Ok(rows)
}

/// Titles containing characters that are rarely part of a real title
pub fn suspicious_titles(rows: &[EpisodeRow]) -> Vec<&str> {
    rows.iter()
        .map(|row| row.title.as_str())
        .filter(|title| title.contains(SUSPICIOUS_CHARS))
        .collect()
}

/// Fail on suspicious titles unless they were confirmed
pub fn check_titles(rows: &[EpisodeRow], confirmed: bool) -> Result<()> {
    let suspicious = suspicious_titles(rows);
    if suspicious.is_empty() || confirmed {
        return Ok(());
    }
    let listed: Vec<String> = suspicious.iter().map(|t| format!(" * {}", t)).collect();
    Err(WdbotError::SuspiciousTitles(listed.join("\n")))
}

fn ordinal_claim(property: wdbot_core::PropertyId, target: ItemId, ordinal: u32) -> Claim {
    Claim::new(property, Value::Item(target))
        .with_qualifier(SERIES_ORDINAL.id, Value::String(ordinal.to_string()))
}

/// Draft season `ordinal` of the series labelled `series_label`
pub fn season_draft(series: ItemId, series_label: &str, ordinal: u32) -> ItemDraft {
    ItemDraft::new()
        .with_label("en", &format!("{}, season {}", series_label, ordinal))
        .with_description("en", &format!("season {} of {}", ordinal, series_label))
        .with_claim(Claim::new(
            INSTANCE_OF.id,
            Value::Item(instance::TELEVISION_SERIES_SEASON),
        ))
        .with_claim(ordinal_claim(PART_OF_THE_SERIES.id, series, ordinal))
}

/// Drafts for seasons 1 to `count` of `series`
pub fn season_drafts(series: &Entity, count: u32) -> Result<Vec<ItemDraft>> {
    let label = series.label().ok_or_else(|| {
        WdbotError::InvalidInput(format!("{} has no English label to name seasons after", series.id()))
    })?;
    Ok((1..=count)
        .map(|ordinal| season_draft(series.id(), label, ordinal))
        .collect())
}

pub fn episode_draft(series: ItemId, season: ItemId, row: &EpisodeRow) -> ItemDraft {
    ItemDraft::new()
        .with_label("en", &row.title)
        .with_claim(Claim::new(
            INSTANCE_OF.id,
            Value::Item(instance::TELEVISION_SERIES_EPISODE),
        ))
        .with_claim(ordinal_claim(PART_OF_THE_SERIES.id, series, row.series_ordinal))
        .with_claim(ordinal_claim(SEASON.id, season, row.season_ordinal))
}

/// The season must already belong to the series the episodes are created for
pub fn check_season_of(season: &Entity, series: ItemId) -> Result<()> {
    match season.first_claim(PART_OF_THE_SERIES.id).and_then(Value::as_item) {
        Some(actual) if actual == series => Ok(()),
        Some(actual) => Err(WdbotError::InvalidInput(format!(
            "season {} is part of {} but expected {}; check the series and season ids",
            season.id(),
            actual,
            series
        ))),
        None => Err(WdbotError::InvalidInput(format!(
            "season {} has no {}; check the series and season ids",
            season.id(),
            PART_OF_THE_SERIES
        ))),
    }
}

/// What to do with the drafts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Print a QuickStatements batch and touch nothing
    QuickStatements,
    /// Describe each item and claim and touch nothing
    DryRun,
    Apply,
}

/// Turn drafts into items, writing progress to `out`.
///
/// Returns the ids of the created items; nothing is created outside `Apply`.
pub fn create_items(
    store: &dyn Store,
    drafts: &[ItemDraft],
    mode: CreateMode,
    out: &mut dyn Write,
) -> Result<Vec<ItemId>> {
    let mut created = Vec::new();
    for draft in drafts {
        let label = draft.label("en").unwrap_or("(no label)");
        match mode {
            CreateMode::QuickStatements => writeln!(out, "{}", draft.quickstatements()?)?,
            CreateMode::DryRun => {
                writeln!(out, "[DRY-RUN] Creating item with label='{}'", label)?;
                if let Some(description) = draft.description("en") {
                    writeln!(out, "[DRY-RUN]   description='{}'", description)?;
                }
                for claim in &draft.claims {
                    writeln!(out, "[DRY-RUN]   {}", describe(claim))?;
                }
            }
            CreateMode::Apply => {
                let id = store.create_item(draft, &format!("Creating {}", label))?;
                writeln!(out, "Created {}: {}", id, label)?;
                created.push(id);
            }
        }
    }
    Ok(created)
}

/// "Setting P179 (part of the series)=Q4, with P1545 (series ordinal)=2"
fn describe(claim: &Claim) -> String {
    let mut text = format!(
        "Setting {}={}",
        properties::lookup(claim.property),
        claim.value
    );
    for qualifier in &claim.qualifiers {
        text.push_str(&format!(
            ", with {}={}",
            properties::lookup(qualifier.property),
            qualifier.value
        ));
    }
    text
}
