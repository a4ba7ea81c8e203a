//! CLI command implementations

pub mod check;
pub mod create;
pub mod labels;
pub mod operator;
pub mod output;
pub mod rules;
pub mod tv_show;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use wdbot_bot::{get_bot, BotOptions, Checker, FixFilter, Policy, RunSummary};
use wdbot_constraint::{ConstraintRegistry, ConstraintSet, Operator};
use wdbot_core::ItemId;
use wdbot_model::{Factory, Repo};
use wdbot_remote::{build_catalog, SparqlClient, WdbotConfig, WikibaseClient};

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct Global {
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Flags controlling how a run checks and fixes
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Fix constraint violations
    #[arg(long)]
    pub autofix: bool,

    /// Collect every fix before applying any of them (with --autofix)
    #[arg(long)]
    pub accumulate: bool,

    /// Confirm every fix, not only label and description changes
    #[arg(long)]
    pub interactive: bool,

    /// Comma separated property ids or names; only matching fixes are applied
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Apply accumulated fixes in the order they were found
    #[arg(long)]
    pub no_sort: bool,

    /// Output format (text or json)
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RunArgs {
    pub fn policy(&self) -> Policy {
        Policy::from_flags(self.autofix, self.accumulate)
    }

    fn options(&self, config: &WdbotConfig) -> BotOptions {
        BotOptions {
            filter: FixFilter::parse(&self.filter),
            confirm_all: self.interactive,
            sort: !self.no_sort && config.sort(),
        }
    }
}

impl Global {
    pub fn load_config(&self) -> Result<WdbotConfig> {
        let config = match &self.config {
            Some(path) => WdbotConfig::load_from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => WdbotConfig::load().context("failed to load config")?,
        };
        Ok(config)
    }
}

/// The configured rule table, expanded against the configured sources
pub fn load_constraints(config: &WdbotConfig) -> Result<ConstraintSet> {
    let registry = match config.rule_file() {
        Some(path) => {
            let mut registry = ConstraintRegistry::new();
            registry
                .load_file(path)
                .with_context(|| format!("failed to load rules {}", path.display()))?;
            registry
        }
        None => ConstraintRegistry::with_defaults()?,
    };
    let catalog = build_catalog(config)?;
    Ok(registry.build(&catalog))
}

pub fn connect(config: &WdbotConfig) -> Repo {
    tracing::debug!(api = config.wikibase.api_url(), sparql = config.wikibase.sparql_url(), "connecting");
    Repo::new(
        Arc::new(WikibaseClient::from_config(&config.wikibase)),
        Arc::new(SparqlClient::from_config(&config.wikibase)),
    )
}

/// Drive `ids` through the bot selected by `args`
pub fn run_bot(
    repo: Repo,
    constraints: ConstraintSet,
    ids: Vec<ItemId>,
    args: &RunArgs,
    options: BotOptions,
    operator: Box<dyn Operator>,
    verbose: bool,
) -> Result<RunSummary> {
    let checker = Checker::new(Factory::new(repo), constraints).verbose(verbose);
    let mut bot = get_bot(args.policy(), checker, operator, options);
    let summary = bot.run(&mut ids.into_iter())?;
    Ok(summary)
}

/// Run against the live store, print the result, and fail a dirty check-only run
pub fn execute(
    global: &Global,
    config: &WdbotConfig,
    repo: Repo,
    ids: Vec<ItemId>,
    args: &RunArgs,
) -> Result<()> {
    let constraints = load_constraints(config)?;
    let summary = run_bot(
        repo,
        constraints,
        ids,
        args,
        args.options(config),
        Box::new(operator::TerminalOperator::new()),
        global.verbose,
    )?;

    output::print_summary(&summary, args.format)?;

    if args.policy() == Policy::Check && !summary.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
