//! Unattended English-label fixing
//!
//! Meant for selections of items already known to lack a label, such as the
//! result of a query. Label fixes are written without prompting; a dry run
//! only shows them.

use crate::checker::Checker;
use crate::summary::RunSummary;
use crate::Bot;
use wdbot_constraint::{Fix, Operator, Rule};
use wdbot_core::{ItemId, Result};

/// Labels longer than this are rejected by the store
pub const MAX_LABEL_LEN: usize = 250;

pub struct LabelFixer {
    checker: Checker,
    operator: Box<dyn Operator>,
    dry: bool,
}

impl LabelFixer {
    pub fn new(checker: Checker, operator: Box<dyn Operator>) -> Self {
        Self {
            checker,
            operator,
            dry: false,
        }
    }

    /// Show every label instead of writing it
    pub fn dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }
}

impl Bot for LabelFixer {
    fn run(&mut self, ids: &mut dyn Iterator<Item = ItemId>) -> Result<RunSummary> {
        self.checker.start()?;
        let mut summary = RunSummary::default();
        let prefix = if self.dry { "[DRY-RUN] " } else { "" };

        for id in ids {
            let outcome = self.checker.check(id)?;
            let store = self.checker.factory().repo().store();

            for constraint in outcome
                .unsatisfied
                .iter()
                .filter(|c| matches!(c.rule(), Rule::HasEnglishLabel(_)))
            {
                for fix in constraint.fix(&outcome.entity)? {
                    let Fix::Label(label) = &fix else {
                        continue;
                    };
                    if label.text.chars().count() > MAX_LABEL_LEN {
                        tracing::info!(target_item = %label.target, "title too long for a label, skipping");
                        continue;
                    }

                    summary.fixes_proposed += 1;
                    self.operator.show(&format!("{}{}", prefix, fix));
                    if !self.dry {
                        fix.commit(store)?;
                        summary.fixes_applied += 1;
                    }
                }
            }
            summary.record(outcome.report());
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{constraints, show, RecordingOperator, EPISODE_1, EPISODE_2, EPISODE_3};
    use wdbot_core::properties::{instance, INSTANCE_OF, TITLE};
    use wdbot_core::Value;
    use wdbot_model::memory::Mutation;
    use wdbot_model::{Factory, ItemData};

    fn label_only(mem: &std::sync::Arc<wdbot_model::memory::MemoryRepo>) -> Checker {
        let set = constraints().retain(|c| matches!(c.rule(), Rule::HasEnglishLabel(_)));
        Checker::new(Factory::new(mem.repo()), set)
    }

    #[test]
    fn test_sets_label_from_title_without_prompting() {
        let mem = show();
        let (operator, transcript) = RecordingOperator::new(false);
        let mut bot = LabelFixer::new(label_only(&mem), operator);

        let summary = bot
            .run(&mut [EPISODE_1, EPISODE_2, EPISODE_3].into_iter())
            .unwrap();

        assert_eq!(summary.fixes_applied, 1);
        assert_eq!(summary.failures, 1);
        assert!(transcript.borrow().prompts.is_empty());
        assert_eq!(
            transcript.borrow().shown,
            vec!["Q202: Setting en label of Q202 to Tabula Rasa".to_string()]
        );
        assert!(matches!(
            &mem.mutations()[0],
            Mutation::Label { id, text, .. } if *id == EPISODE_2 && text == "Tabula Rasa"
        ));
    }

    #[test]
    fn test_dry_run_only_shows() {
        let mem = show();
        let (operator, transcript) = RecordingOperator::new(true);
        let mut bot = LabelFixer::new(label_only(&mem), operator).dry(true);

        let summary = bot.run(&mut std::iter::once(EPISODE_2)).unwrap();
        assert_eq!(summary.fixes_proposed, 1);
        assert_eq!(summary.fixes_applied, 0);
        assert_eq!(
            transcript.borrow().shown,
            vec!["[DRY-RUN] Q202: Setting en label of Q202 to Tabula Rasa".to_string()]
        );
        assert!(mem.mutations().is_empty());
    }

    #[test]
    fn test_overlong_title_is_skipped() {
        let mem = show();
        let long = ItemId::from_raw(900);
        mem.insert(
            ItemData::new(long)
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE))
                .with(TITLE.id, Value::text("x".repeat(MAX_LABEL_LEN + 1), "en")),
        );
        let (operator, _) = RecordingOperator::new(true);
        let mut bot = LabelFixer::new(label_only(&mem), operator);

        let summary = bot.run(&mut std::iter::once(long)).unwrap();
        assert_eq!(summary.fixes_proposed, 0);
        assert!(mem.mutations().is_empty());
    }
}
