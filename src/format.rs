//! Line oriented rendering of a run summary, one metric per line.
//!
//! This is the alternate, file based sink for the summary: each entry of
//! `summary_entries` is fed through `SummaryLineFormatter::format_line` and
//! every returned line is printed as is.

use constants::{GC_LOG_FILE, GC_TIME_SERIES};
use model::GcModel;
use time;

const SEPARATOR: &str = ",";
const APP_TAG: &str = "app=";
const UNKNOWN_LOG: &str = "unknown";

/// Formats summary entries as `gcTimeSeries,app=<log> <tag>=<value> <ms>`.
///
/// The formatter is stateful: a `gcLogFile` entry is not printed but
/// remembered, and names the log in every following line.
#[derive(Clone, Debug, Default)]
pub struct SummaryLineFormatter {
    gc_log: Option<String>,
}

impl SummaryLineFormatter {
    /// Make a formatter that has not seen a log identifier yet.
    pub fn new() -> SummaryLineFormatter {
        SummaryLineFormatter::default()
    }

    /// Format one entry. Units are accepted for symmetry with other
    /// summary formats and ignored.
    pub fn format_line(&mut self, tag: &str, value: &str, _units: &str) -> Option<String> {
        if tag == GC_LOG_FILE {
            self.gc_log = Some(value.to_string());
            return None;
        }
        let log = self.gc_log.as_ref().map_or(UNKNOWN_LOG, |s| s.as_str());
        Some(format!(
            "{}{}{}{} {}={} {}",
            GC_TIME_SERIES,
            SEPARATOR,
            APP_TAG,
            log,
            tag,
            value,
            time::now_ms()
        ))
    }
}

/// The summary of `model` as `(tag, value, units)` triples, led by the
/// `gcLogFile` entry naming `log_name`.
pub fn summary_entries(model: &GcModel, log_name: &str) -> Vec<(&'static str, String, &'static str)> {
    vec![
        (GC_LOG_FILE, log_name.to_string(), "-"),
        ("gcEvents", model.size().to_string(), "-"),
        ("totalGCPause", model.pause.sum().to_string(), "s"),
        ("pauseMin", model.pause.min().to_string(), "s"),
        ("pauseMax", model.pause.max().to_string(), "s"),
        ("pauseAvg", model.pause.average().to_string(), "s"),
        ("fullGCNum", model.full_gc_pause.n().to_string(), "-"),
        ("fullGCSum", model.full_gc_pause.sum().to_string(), "s"),
        ("freedMemory", model.freed_memory.total.to_string(), "K"),
        ("freedMemoryByGC", model.freed_memory.by_gc.to_string(), "K"),
        ("freedMemoryFullGC", model.freed_memory.by_full_gc.to_string(), "K"),
        ("footprint", model.footprint.to_string(), "K"),
        ("throughput", model.throughput.to_string(), "%"),
    ]
}

/// Run every summary entry of `model` through a fresh formatter.
pub fn summary_lines(model: &GcModel, log_name: &str) -> Vec<String> {
    let mut formatter = SummaryLineFormatter::new();
    summary_entries(model, log_name)
        .iter()
        .filter_map(|&(tag, ref value, units)| formatter.format_line(tag, value, units))
        .collect()
}
