//! wdbot Bot - Orchestrators that check and fix streams of items
//!
//! - [`Checker`] evaluates constraints and never writes.
//! - [`Fixer`] applies each entity's fixes right after checking it.
//! - [`AccumulatingFixer`] checks everything first, then previews and applies
//!   the buffered fixes in one pass.
//! - [`LabelFixer`] writes missing English labels without prompting, for
//!   canned runs over a query selection.
//!
//! The [`create`] module drafts and creates the season and episode items of a show.
//!
//! Every bot runs once; a second `run` fails with `WdbotError::AlreadyRun`.

mod accumulating;
mod checker;
pub mod create;
mod filter;
mod fixer;
mod labels;
mod summary;

#[cfg(test)]
mod testing;

pub use accumulating::{AccumulatingFixer, Phase};
pub use checker::{Checker, Outcome};
pub use filter::{should_fix, FixFilter};
pub use fixer::Fixer;
pub use labels::{LabelFixer, MAX_LABEL_LEN};
pub use summary::RunSummary;

use wdbot_constraint::Operator;
use wdbot_core::{ItemId, Result};

/// A single pass over a stream of item identifiers
pub trait Bot {
    fn run(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<RunSummary>;
}

/// Which orchestrator to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Check,
    Fix,
    Accumulate,
}

impl Policy {
    /// `accumulate` only matters together with `autofix`
    pub fn from_flags(autofix: bool, accumulate: bool) -> Self {
        match (autofix, accumulate) {
            (false, _) => Policy::Check,
            (true, false) => Policy::Fix,
            (true, true) => Policy::Accumulate,
        }
    }
}

/// Settings shared by the fixing bots
#[derive(Debug, Clone)]
pub struct BotOptions {
    pub filter: FixFilter,
    pub confirm_all: bool,
    pub sort: bool,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            filter: FixFilter::default(),
            confirm_all: false,
            sort: true,
        }
    }
}

/// Build the bot for a policy
pub fn get_bot(
    policy: Policy,
    checker: Checker,
    operator: Box<dyn Operator>,
    options: BotOptions,
) -> Box<dyn Bot> {
    match policy {
        Policy::Check => Box::new(checker),
        Policy::Fix => Box::new(
            Fixer::new(checker, options.filter, operator).confirm_all(options.confirm_all),
        ),
        Policy::Accumulate => Box::new(
            AccumulatingFixer::new(checker, options.filter, operator)
                .sort(options.sort)
                .confirm_all(options.confirm_all),
        ),
    }
}
