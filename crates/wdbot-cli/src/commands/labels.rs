//! Canned run: set missing English labels on a query selection

use super::{connect, load_constraints, operator, output, Global, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use wdbot_bot::{Bot, Checker, LabelFixer, RunSummary};
use wdbot_constraint::{ConstraintSet, Operator, Rule};
use wdbot_core::properties::{instance, BOARD_GAME_GEEK_ID, INSTANCE_OF, PART_OF_THE_SERIES, TITLE};
use wdbot_core::{ItemId, PropertyId};
use wdbot_model::{EntityKind, Factory, Pattern, Repo};

/// Items a canned label run can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LabelTarget {
    Episode,
    Series,
    BoardGame,
}

impl LabelTarget {
    fn kind(self) -> EntityKind {
        match self {
            LabelTarget::Episode => EntityKind::Episode,
            LabelTarget::Series => EntityKind::Series,
            LabelTarget::BoardGame => EntityKind::BoardGame,
        }
    }

    fn instance_type(self) -> ItemId {
        match self {
            LabelTarget::Episode => instance::TELEVISION_SERIES_EPISODE,
            LabelTarget::Series => instance::TELEVISION_SERIES,
            LabelTarget::BoardGame => instance::BOARD_GAME,
        }
    }

    /// Where a label can come from: the title, or the id a source looks up
    fn label_source(self) -> PropertyId {
        match self {
            LabelTarget::Episode | LabelTarget::Series => TITLE.id,
            LabelTarget::BoardGame => BOARD_GAME_GEEK_ID.id,
        }
    }
}

/// Unlabelled items of the target type that have something to label them with
pub fn selection(target: LabelTarget, series: Option<ItemId>) -> Pattern {
    let mut pattern = Pattern::new().with(INSTANCE_OF.id, target.instance_type());
    if let Some(series) = series {
        pattern = pattern.with(PART_OF_THE_SERIES.id, series);
    }
    pattern.having(target.label_source()).without_label("en")
}

/// The label rules of the rule table, and nothing else
pub fn label_constraints(constraints: ConstraintSet) -> ConstraintSet {
    constraints.retain(|c| matches!(c.rule(), Rule::HasEnglishLabel(_)))
}

pub fn fix_labels(
    repo: Repo,
    constraints: ConstraintSet,
    ids: Vec<ItemId>,
    dry: bool,
    operator: Box<dyn Operator>,
    verbose: bool,
) -> Result<RunSummary> {
    let checker = Checker::new(Factory::new(repo), constraints).verbose(verbose);
    let mut bot = LabelFixer::new(checker, operator).dry(dry);
    Ok(bot.run(&mut ids.into_iter())?)
}

pub fn run(
    global: &Global,
    target: LabelTarget,
    raw_series: Option<&str>,
    dry: bool,
) -> Result<()> {
    let series = raw_series
        .map(|raw| {
            raw.parse::<ItemId>()
                .with_context(|| format!("bad series id '{}'", raw))
        })
        .transpose()?;
    if series.is_some() && target != LabelTarget::Episode {
        bail!("--series only narrows episode selections");
    }

    let config = global.load_config()?;
    let constraints = label_constraints(load_constraints(&config)?);
    if constraints.constraints(target.kind()).is_empty() {
        bail!("the rule table has no has_english_label rule for {}", target.kind());
    }

    let repo = connect(&config);
    let pattern = selection(target, series);
    let ids = repo.query().find(&pattern)?;
    tracing::info!(pattern = %pattern, count = ids.len(), "selected items without an English label");
    if dry {
        tracing::info!("dry run, no labels will be written");
    }

    let summary = fix_labels(
        repo,
        constraints,
        ids,
        dry,
        Box::new(operator::TerminalOperator::new()),
        global.verbose,
    )?;
    output::print_summary(&summary, OutputFormat::Text)
}
