use super::style;
use crate::story::{JudgeReport, Metrics};
use std::fmt::Write;

const LABEL_WIDTH: usize = 22;

/// Rubric scores in fixed order, then the verdict, fixes, and strengths.
pub fn render_scores(report: &JudgeReport) -> String {
    let mut out = format!("{}\n", style::header("JUDGE SCORES (0-5)"));
    for (criterion, points) in report.scores.iter() {
        let name = format!("{:<LABEL_WIDTH$}", criterion.to_string());
        let _ = writeln!(out, "  {}: {}", style::label(name), style::score(points));
    }
    let verdict = format!("{:<LABEL_WIDTH$}", "verdict");
    let _ = writeln!(out, "  {}: {}", style::label(verdict), style::verdict(report.verdict));

    if !report.required_fixes.is_empty() {
        out.push_str("  required_fixes:\n");
        for fix in &report.required_fixes {
            let _ = writeln!(out, "   - {}", style::yellow(fix));
        }
    }
    if !report.keep_strengths.is_empty() {
        out.push_str("  keep_strengths:\n");
        for strength in &report.keep_strengths {
            let _ = writeln!(out, "   - {}", style::value(strength));
        }
    }
    out
}

pub fn render_metrics(metrics: &Metrics) -> String {
    let mut out = format!("{}\n", style::header("OBJECTIVE METRICS"));
    for (name, value) in metrics.rows() {
        let name = format!("{name:<LABEL_WIDTH$}");
        let _ = writeln!(out, "  {}: {value}", style::label(name));
    }
    out
}
