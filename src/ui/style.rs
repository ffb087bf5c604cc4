use crate::story::Verdict;
use console::style;
use std::fmt::Display;

/// White bold: section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: rules, hints, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Cyan: field labels
pub fn label<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}

/// Yellow: fixes and warnings
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green: strengths and confirmed values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Score out of five: green at the bar, yellow just under, red below.
pub fn score(points: u8) -> String {
    let styled = style(points);
    match points {
        4..=5 => styled.green().bold(),
        3 => styled.yellow(),
        _ => styled.red().bold(),
    }
    .to_string()
}

pub fn verdict(verdict: Verdict) -> String {
    match verdict {
        Verdict::Pass => style(verdict).green().bold().to_string(),
        Verdict::Revise => style(verdict).yellow().bold().to_string(),
    }
}
