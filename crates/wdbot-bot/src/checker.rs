//! Read-only constraint checking

use crate::summary::RunSummary;
use crate::Bot;
use wdbot_constraint::{Constraint, ConstraintSet, ValidationReport};
use wdbot_core::{ItemId, Result, WdbotError};
use wdbot_model::{Factory, TypedEntity};

/// The constraints an entity passed and failed
#[derive(Debug)]
pub struct Outcome<'a> {
    pub entity: TypedEntity,
    pub satisfied: Vec<&'a Constraint>,
    pub unsatisfied: Vec<&'a Constraint>,
}

impl Outcome<'_> {
    pub fn report(&self) -> ValidationReport {
        ValidationReport::new(&self.entity, &self.satisfied, &self.unsatisfied)
    }
}

/// Evaluates every applicable constraint on each entity. Never mutates.
pub struct Checker {
    factory: Factory,
    constraints: ConstraintSet,
    verbose: bool,
    has_run: bool,
}

impl Checker {
    pub fn new(factory: Factory, constraints: ConstraintSet) -> Self {
        Self {
            factory,
            constraints,
            verbose: false,
            has_run: false,
        }
    }

    /// Log every passed and failed constraint, not just the counts
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Load, classify and check one item
    pub fn check(&self, id: ItemId) -> Result<Outcome<'_>> {
        let entity = self.factory.get_typed_item(id)?;
        self.check_entity(entity)
    }

    pub fn check_entity(&self, entity: TypedEntity) -> Result<Outcome<'_>> {
        tracing::info!(entity = %entity, "checking constraints");
        let mut satisfied = Vec::new();
        let mut unsatisfied = Vec::new();
        for constraint in self.constraints.constraints(entity.kind()) {
            if constraint.validate(&entity)? {
                satisfied.push(constraint);
            } else {
                unsatisfied.push(constraint);
            }
        }

        if self.verbose {
            for constraint in &unsatisfied {
                tracing::info!("{} failed for {}", constraint, entity);
            }
            for constraint in &satisfied {
                tracing::info!("{} passed for {}", constraint, entity);
            }
        }
        tracing::info!(
            "Found {}/{} constraint failures",
            unsatisfied.len(),
            satisfied.len() + unsatisfied.len()
        );

        Ok(Outcome {
            entity,
            satisfied,
            unsatisfied,
        })
    }

    /// Guard shared by every bot: a bot runs once
    pub(crate) fn start(&mut self) -> Result<()> {
        if self.has_run {
            return Err(WdbotError::AlreadyRun);
        }
        self.has_run = true;
        Ok(())
    }
}

impl Bot for Checker {
    fn run(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<RunSummary> {
        self.start()?;
        let mut summary = RunSummary::default();
        for id in ids {
            let report = self.check(id)?.report();
            summary.record(report);
        }
        Ok(summary)
    }
}
