use serde::Serialize;
use wdbot_constraint::ValidationReport;

/// Totals for one bot run, plus the reports of entities that failed.
///
/// Passing entities only bump the counters so a long stream stays small.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub entities: usize,
    pub constraints: usize,
    pub failures: usize,
    pub fixes_proposed: usize,
    pub fixes_applied: usize,
    pub reports: Vec<ValidationReport>,
}

impl RunSummary {
    pub fn record(&mut self, report: ValidationReport) {
        self.entities += 1;
        self.constraints += report.total();
        self.failures += report.violations.len();
        if !report.is_valid() {
            self.reports.push(report);
        }
    }

    /// True when no constraint failed on any entity
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "Checked {} item(s): {}/{} constraint failures",
            self.entities, self.failures, self.constraints
        );
        if self.fixes_proposed > 0 {
            line.push_str(&format!(
                ", applied {}/{} fixes",
                self.fixes_applied, self.fixes_proposed
            ));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdbot_constraint::Violation;
    use wdbot_core::ItemId;
    use wdbot_model::EntityKind;

    fn report(id: u64, failing: bool) -> ValidationReport {
        let violations = if failing {
            vec![Violation {
                constraint_name: "has_property(director)".to_string(),
                has_auto_fix: false,
            }]
        } else {
            Vec::new()
        };
        ValidationReport {
            entity_id: ItemId::from_raw(id),
            entity: format!("Episode(Q{id})"),
            kind: EntityKind::Episode,
            passed: vec!["has_property(instance of)".to_string()],
            violations,
        }
    }

    #[test]
    fn test_record_keeps_only_failing_reports() {
        let mut summary = RunSummary::default();
        for id in 1..=1000 {
            summary.record(report(id, id == 500));
        }

        assert_eq!(summary.entities, 1000);
        assert_eq!(summary.constraints, 1001);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].entity_id, ItemId::from_raw(500));
    }

    #[test]
    fn test_summary_line() {
        let mut summary = RunSummary::default();
        summary.record(report(1, true));
        summary.fixes_proposed = 2;
        summary.fixes_applied = 1;
        assert_eq!(
            summary.summary(),
            "Checked 1 item(s): 1/2 constraint failures, applied 1/2 fixes"
        );
    }
}
