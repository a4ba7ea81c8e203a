//! Check-then-fix, one entity at a time

use crate::checker::Checker;
use crate::filter::FixFilter;
use crate::summary::RunSummary;
use crate::Bot;
use wdbot_constraint::{Fix, Operator};
use wdbot_core::{ItemId, Result};

/// Applies the fixes for each entity right after checking it
pub struct Fixer {
    checker: Checker,
    filter: FixFilter,
    operator: Box<dyn Operator>,
    confirm_all: bool,
}

impl Fixer {
    pub fn new(checker: Checker, filter: FixFilter, operator: Box<dyn Operator>) -> Self {
        Self {
            checker,
            filter,
            operator,
            confirm_all: false,
        }
    }

    /// Ask the operator before every fix, not only labels and descriptions
    pub fn confirm_all(mut self, confirm_all: bool) -> Self {
        self.confirm_all = confirm_all;
        self
    }
}

impl Bot for Fixer {
    fn run(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<RunSummary> {
        self.checker.start()?;
        let mut summary = RunSummary::default();

        for id in ids {
            let outcome = self.checker.check(id)?;
            let mut fixes: Vec<Fix> = Vec::new();
            for constraint in &outcome.unsatisfied {
                fixes.extend(constraint.fix(&outcome.entity)?);
            }

            let store = self.checker.factory().repo().store();
            let mut fixed = 0;
            for fix in fixes.iter().filter(|f| self.filter.allows(f)) {
                summary.fixes_proposed += 1;
                if fix.apply(store, self.operator.as_mut(), self.confirm_all)? {
                    fixed += 1;
                }
            }
            tracing::info!(
                "Fixed {}/{} constraint failures",
                fixed,
                outcome.unsatisfied.len()
            );

            summary.fixes_applied += fixed;
            summary.record(outcome.report());
        }

        Ok(summary)
    }
}
