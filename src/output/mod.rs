//! Rendering of a finished run
//!
//! Plain text lists one id per line with optional tab/URL prefixes. JSON
//! carries the counters, invalid candidates, per-account results and the
//! final id list without prefixes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::{self, Write};

use crate::fetch_engine::{RunReport, RunSummary};
use crate::utils::{TAB_OUTPUT_PREFIX, WATCH_URL_PREFIX};

/// Input counters of the JSON payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonInputs {
    pub total: u64,
    pub valid: u64,
    pub invalid: u64,
}

/// One fetched account in the JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResult {
    pub user_id: String,
    pub items: Vec<String>,
    /// Empty when the fetch finished cleanly.
    pub error: String,
}

/// Full JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOutput {
    pub inputs: JsonInputs,
    pub invalid: Vec<String>,
    pub users: Vec<UserResult>,
    pub errors: Vec<String>,
    pub output_count: usize,
    pub items: Vec<String>,
}

impl JsonOutput {
    /// Assemble the payload from a run report.
    #[must_use]
    pub fn from_report(report: &RunReport) -> Self {
        let mut users: Vec<UserResult> = report
            .outcomes
            .iter()
            .map(|outcome| UserResult {
                user_id: outcome.user_id.clone(),
                items: outcome.items.clone(),
                error: outcome
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            })
            .collect();
        sort_user_results(&mut users);

        Self {
            inputs: JsonInputs {
                total: report.summary.total_inputs,
                valid: report.summary.valid_inputs,
                invalid: report.summary.invalid_inputs,
            },
            invalid: report.invalid_inputs.clone(),
            users,
            errors: report.errors.clone(),
            output_count: report.ids.len(),
            items: report.ids.clone(),
        }
    }
}

/// Order accounts by numeric id; non-numeric ids after numeric ones, ties by error.
pub fn sort_user_results(users: &mut [UserResult]) {
    users.sort_by(|a, b| {
        let numeric = match (a.user_id.parse::<u64>(), b.user_id.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => Ordering::Equal,
        };
        numeric
            .then_with(|| a.user_id.cmp(&b.user_id))
            .then_with(|| a.error.cmp(&b.error))
    });
}

/// Prefix each id for line output.
#[must_use]
pub fn format_output_ids(ids: &[String], tab: bool, url: bool) -> Vec<String> {
    let mut prefix = String::new();
    if tab {
        prefix.push_str(TAB_OUTPUT_PREFIX);
    }
    if url {
        prefix.push_str(WATCH_URL_PREFIX);
    }
    ids.iter().map(|id| format!("{prefix}{id}")).collect()
}

/// Write the id list, one per line. Nothing is written for an empty list.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_text<W: Write>(out: &mut W, ids: &[String], tab: bool, url: bool) -> io::Result<()> {
    for line in format_output_ids(ids, tab, url) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Write the JSON payload followed by a newline.
///
/// # Errors
///
/// Propagates write and serialization failures.
pub fn write_json<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    serde_json::to_writer(&mut *out, &JsonOutput::from_report(report))?;
    writeln!(out)?;
    out.flush()
}

/// The one-line run summary printed on stderr.
#[must_use]
pub fn summary_line(summary: &RunSummary, output_count: usize) -> String {
    format!(
        "summary inputs={} valid={} invalid={} fetch_ok={} fetch_err={} output_count={output_count}",
        summary.total_inputs,
        summary.valid_inputs,
        summary.invalid_inputs,
        summary.fetch_ok,
        summary.fetch_err,
    )
}
