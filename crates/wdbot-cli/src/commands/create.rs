//! Create the season and episode items of a show

use super::{connect, Global};
use anyhow::{Context, Result};
use clap::Args;
use std::io;
use std::path::Path;
use wdbot_bot::create::{
    check_season_of, check_titles, create_items, episode_draft, parse_titles, season_drafts,
    CreateMode,
};
use wdbot_core::ItemId;
use wdbot_model::{Entity, ItemDraft};

/// How the new items are produced
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Print QuickStatements instead of creating anything
    #[arg(long, conflicts_with = "dry")]
    pub quickstatements: bool,

    /// Only print what would be created
    #[arg(long)]
    pub dry: bool,
}

impl CreateArgs {
    pub fn mode(&self) -> CreateMode {
        if self.quickstatements {
            CreateMode::QuickStatements
        } else if self.dry {
            CreateMode::DryRun
        } else {
            CreateMode::Apply
        }
    }
}

fn parse_id(raw: &str, what: &str) -> Result<ItemId> {
    raw.parse()
        .with_context(|| format!("bad {} id '{}'", what, raw))
}

pub fn run_seasons(global: &Global, raw_series: &str, count: u32, args: &CreateArgs) -> Result<()> {
    let series = parse_id(raw_series, "series")?;
    let config = global.load_config()?;
    let repo = connect(&config);

    let series = Entity::load(&repo, series)?;
    let drafts = season_drafts(&series, count)?;
    let created = create_items(repo.store(), &drafts, args.mode(), &mut io::stdout().lock())?;
    tracing::info!(series = %series.id(), created = created.len(), "done creating seasons");
    Ok(())
}

/// Parse and vet a titles file, then draft one episode per line
pub fn plan_episodes(
    series: ItemId,
    season: ItemId,
    titles: &str,
    confirm_titles: bool,
) -> Result<Vec<ItemDraft>> {
    let rows = parse_titles(titles)?;
    check_titles(&rows, confirm_titles)?;
    Ok(rows
        .iter()
        .map(|row| episode_draft(series, season, row))
        .collect())
}

pub fn run_episodes(
    global: &Global,
    raw_series: &str,
    raw_season: &str,
    titles_file: &Path,
    confirm_titles: bool,
    args: &CreateArgs,
) -> Result<()> {
    let series = parse_id(raw_series, "series")?;
    let season = parse_id(raw_season, "season")?;
    let titles = std::fs::read_to_string(titles_file)
        .with_context(|| format!("failed to read titles {}", titles_file.display()))?;
    let drafts = plan_episodes(series, season, &titles, confirm_titles)?;

    let config = global.load_config()?;
    let repo = connect(&config);
    if args.mode() != CreateMode::QuickStatements {
        check_season_of(&Entity::load(&repo, season)?, series)?;
    }

    let created = create_items(repo.store(), &drafts, args.mode(), &mut io::stdout().lock())?;
    tracing::info!(season = %season, created = created.len(), "done creating episodes");
    Ok(())
}
