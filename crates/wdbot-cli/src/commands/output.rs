//! Run reports on stdout

use super::OutputFormat;
use anyhow::Result;
use wdbot_bot::RunSummary;

pub fn print_summary(summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(summary)),
        OutputFormat::Json => println!("{}", render_json(summary)?),
    }
    Ok(())
}

pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        if report.is_valid() {
            continue;
        }
        out.push_str(&format!("{}: {}\n", report.entity, report.summary()));
        for violation in &report.violations {
            let fix_marker = if violation.has_auto_fix { " [fixable]" } else { "" };
            out.push_str(&format!("  {}{}\n", violation.constraint_name, fix_marker));
        }
    }
    if summary.is_clean() {
        out.push_str("All constraints passed.\n");
    }
    out.push_str(&summary.summary());
    out.push('\n');
    out
}

pub fn render_json(summary: &RunSummary) -> Result<String> {
    let mut value = serde_json::to_value(summary)?;
    value["valid"] = serde_json::json!(summary.is_clean());
    value["summary"] = serde_json::json!(summary.summary());
    Ok(serde_json::to_string_pretty(&value)?)
}
