//! Check everything first, then review and apply all fixes in one go

use crate::checker::Checker;
use crate::filter::FixFilter;
use crate::summary::RunSummary;
use crate::Bot;
use wdbot_constraint::{Fix, Operator};
use wdbot_core::{ItemId, Result, WdbotError};

/// Where an [`AccumulatingFixer`] is in its single pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Checking entities and buffering fixes; nothing is written yet
    Scanning,
    /// Sorting and filtering the buffer
    Reviewing,
    /// Previewing and applying the surviving fixes
    Applying,
    Done,
}

/// Buffers every fix during the scan and applies them only once the scan is
/// complete.
///
/// Constraints whose fixes need confirmation are still checked and reported,
/// but produce no fixes here.
pub struct AccumulatingFixer {
    checker: Checker,
    filter: FixFilter,
    operator: Box<dyn Operator>,
    confirm_all: bool,
    sort: bool,
    phase: Phase,
    pending: Vec<Fix>,
    summary: RunSummary,
}

impl AccumulatingFixer {
    pub fn new(checker: Checker, filter: FixFilter, operator: Box<dyn Operator>) -> Self {
        Self {
            checker,
            filter,
            operator,
            confirm_all: false,
            sort: true,
            phase: Phase::Scanning,
            pending: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Sort the buffer by summary before applying (on by default)
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn confirm_all(mut self, confirm_all: bool) -> Self {
        self.confirm_all = confirm_all;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fixes buffered so far
    pub fn pending(&self) -> &[Fix] {
        &self.pending
    }

    /// Check every entity and buffer the fixes. Writes nothing.
    pub fn scan(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<()> {
        if self.phase != Phase::Scanning {
            return Err(WdbotError::AlreadyRun);
        }
        self.checker.start()?;

        for id in ids {
            let outcome = self.checker.check(id)?;
            for constraint in &outcome.unsatisfied {
                if constraint.requires_confirmation() {
                    tracing::debug!(
                        constraint = constraint.name(),
                        entity = %outcome.entity,
                        "fix needs confirmation, not accumulating"
                    );
                    continue;
                }
                self.pending.extend(constraint.fix(&outcome.entity)?);
            }
            self.summary.record(outcome.report());
        }

        self.phase = Phase::Reviewing;
        Ok(())
    }

    /// Sort, filter, preview and apply the buffered fixes
    pub fn finalize(&mut self) -> Result<RunSummary> {
        match self.phase {
            Phase::Reviewing => {}
            Phase::Scanning => {
                self.checker.start()?;
                self.phase = Phase::Reviewing;
            }
            Phase::Applying | Phase::Done => return Err(WdbotError::AlreadyRun),
        }

        let mut fixes = std::mem::take(&mut self.pending);
        if self.sort {
            fixes.sort_by(|a, b| a.summary().cmp(b.summary()));
        }
        let fixes: Vec<Fix> = fixes
            .into_iter()
            .filter(|f| self.filter.allows(f))
            .collect();

        self.phase = Phase::Applying;
        for fix in &fixes {
            self.operator.show(&fix.to_string());
        }

        let store = self.checker.factory().repo().store();
        let mut fixed = 0;
        for fix in &fixes {
            if fix.apply(store, self.operator.as_mut(), self.confirm_all)? {
                fixed += 1;
            }
        }
        tracing::info!("Fixed {}/{} constraint failures", fixed, fixes.len());

        self.phase = Phase::Done;
        let mut summary = std::mem::take(&mut self.summary);
        summary.fixes_proposed = fixes.len();
        summary.fixes_applied = fixed;
        Ok(summary)
    }
}

impl Bot for AccumulatingFixer {
    fn run(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<RunSummary> {
        self.scan(ids)?;
        self.finalize()
    }
}
