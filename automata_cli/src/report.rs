//! Aggregate metrics, summary text, trace listings and match highlighting.

use std::fmt::Write;

use colored::{Color, Colorize};
use seqautomata::RunResult;

/// Rotating colours for consecutive highlighted matches.
pub const PALETTE: [Color; 5] = [
    Color::TrueColor { r: 255, g: 175, b: 0 },
    Color::TrueColor { r: 0, g: 215, b: 255 },
    Color::TrueColor { r: 135, g: 255, b: 0 },
    Color::TrueColor { r: 255, g: 95, b: 255 },
    Color::TrueColor { r: 0, g: 135, b: 255 },
];

/// Running totals over every sequence processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsAggregator {
    runs: usize,
    matches: usize,
    accepts: usize,
}

impl MetricsAggregator {
    pub fn record(&mut self, result: &RunResult) {
        self.runs += 1;
        self.matches += result.matches.len();
        if result.accepted {
            self.accepts += 1;
        }
    }

    pub fn total_runs(&self) -> usize {
        self.runs
    }

    pub fn total_matches(&self) -> usize {
        self.matches
    }

    /// True when nothing has been rejected, including when nothing ran.
    pub fn all_accepted(&self) -> bool {
        self.accepts == self.runs
    }
}

/// What is kept about one processed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    /// At most the first [`Reporter::SUMMARY_LEN`] bytes of the sequence.
    pub sequence: String,
    pub accepted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Reporter {
    reports: Vec<SequenceReport>,
}

impl Reporter {
    pub const SUMMARY_LEN: usize = 40;

    pub fn add(&mut self, sequence: &str, result: &RunResult) {
        let end = sequence
            .char_indices()
            .map(|(i, _)| i)
            .nth(Self::SUMMARY_LEN)
            .unwrap_or(sequence.len());
        self.reports.push(SequenceReport {
            sequence: sequence[..end].to_string(),
            accepted: result.accepted,
        });
    }

    pub fn reports(&self) -> &[SequenceReport] {
        &self.reports
    }

    pub fn summary(&self, metrics: &MetricsAggregator) -> String {
        format!(
            "Runs: {}, Matches: {}, All accepted: {}",
            metrics.total_runs(),
            metrics.total_matches(),
            if metrics.all_accepted() { "yes" } else { "no" }
        )
    }
}

/// One `[index] detail` line per trace event.
pub fn format_trace(result: &RunResult) -> String {
    if result.trace.is_empty() {
        return "Tracing disabled.".to_string();
    }
    let mut out = String::new();
    for event in &result.trace {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "[{}] {}", event.index, event.detail);
    }
    out
}

/// Colours each match in `sequence`, cycling through [`PALETTE`].
///
/// Matches are taken in sorted order. A match that overlaps the previous
/// one only has its uncovered tail coloured and one lying entirely inside
/// it is skipped.
pub fn highlight(sequence: &str, matches: &[(usize, usize)], color: bool) -> String {
    if !color || matches.is_empty() {
        return sequence.to_string();
    }
    let mut matches = matches.to_vec();
    matches.sort_unstable();

    let bytes = sequence.as_bytes();
    let lossy = |from: usize, to: usize| String::from_utf8_lossy(&bytes[from..to]).into_owned();
    let mut out = String::with_capacity(sequence.len() + matches.len() * 16);
    let mut cursor = 0;
    let mut palette = PALETTE.iter().cycle();
    for (start, end) in matches {
        let end = end.min(bytes.len());
        let start = start.min(bytes.len()).max(cursor);
        if end <= start {
            continue;
        }
        out.push_str(&lossy(cursor, start));
        if let Some(&paint) = palette.next() {
            out.push_str(&lossy(start, end).color(paint).to_string());
        }
        cursor = end;
    }
    out.push_str(&lossy(cursor, bytes.len()));
    out
}
