//! Output formatting and persistence for estimation results.
//!
//! Per-date Rt records are rewritten wholesale each run (the filter
//! recomputes the full history); daily snapshots append to a running CSV.

use anyhow::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::rt::{RtOutcome, RtRecord};
use crate::stats::DailySnapshot;

/// Writes all per-date Rt records to `path`, replacing any previous file.
pub fn write_records(path: &str, records: &[RtRecord]) -> Result<()> {
    debug!(path, rows = records.len(), "writing Rt records");

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends a [`DailySnapshot`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_snapshot(path: &str, snapshot: &DailySnapshot) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "appending snapshot record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(snapshot)?;
    writer.flush()?;

    Ok(())
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders the human-readable update: latest indicators, the current Rt
/// estimate with its credible interval, and a short trail of recent point
/// estimates.
pub fn format_report(
    snapshot: Option<&DailySnapshot>,
    outcome: &RtOutcome,
    trail_days: usize,
) -> String {
    let mut out = String::new();

    if let Some(snap) = snapshot {
        out.push_str(&format!("Key indicators for {}\n", snap.date));
        out.push_str(&format!("  new cases: {}\n", snap.new_cases));
        if let Some(tests) = snap.new_tests {
            out.push_str(&format!("  tests completed: {tests}\n"));
        }
        if let Some(positivity) = snap.positivity_percent {
            out.push_str(&format!("  positivity rate: {positivity:.2}%\n"));
        }
        out.push_str(&format!("  cases per 100k: {:.2}\n", snap.cases_per_100k));
    }

    if let Some(latest) = outcome.latest() {
        out.push_str(&format!(
            "Infection rate for {}: {:.2} (90% CI {:.2}-{:.2})\n",
            latest.date, latest.most_likely, latest.low_90, latest.high_90
        ));
    }

    let trail: Vec<String> = outcome
        .records
        .iter()
        .rev()
        .take(trail_days)
        .rev()
        .map(|r| format!("{:.2}", r.most_likely))
        .collect();
    if trail.len() > 1 {
        out.push_str(&format!(
            "Rt trail (last {} days): {}\n",
            trail.len(),
            trail.join(" ")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn record(date: &str, ml: f64) -> RtRecord {
        RtRecord {
            date: date.parse().unwrap(),
            most_likely: ml,
            low_90: ml - 0.2,
            high_90: ml + 0.2,
        }
    }

    fn snapshot() -> DailySnapshot {
        DailySnapshot {
            date: "2020-05-03".parse::<NaiveDate>().unwrap(),
            new_cases: 60,
            new_tests: Some(1500),
            positivity_percent: Some(4.0),
            cases_per_100k: 6.0,
        }
    }

    fn outcome(records: Vec<RtRecord>) -> RtOutcome {
        RtOutcome {
            records,
            log_likelihood: -12.5,
        }
    }

    #[test]
    fn test_write_records_replaces_file() {
        let path = temp_path("rt_tracker_test_records.csv");
        let _ = fs::remove_file(&path);

        write_records(&path, &[record("2020-05-01", 1.1), record("2020-05-02", 1.0)]).unwrap();
        write_records(&path, &[record("2020-05-03", 0.9)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 1 data row after the rewrite
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("2020-05-03"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_snapshot_writes_header_once() {
        let path = temp_path("rt_tracker_test_snapshot.csv");
        let _ = fs::remove_file(&path);

        append_snapshot(&path, &snapshot()).unwrap();
        append_snapshot(&path, &snapshot()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("new_cases")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&snapshot()).unwrap();
    }

    #[test]
    fn test_report_contains_key_fields() {
        let out = outcome(vec![record("2020-05-02", 1.1), record("2020-05-03", 1.02)]);
        let report = format_report(Some(&snapshot()), &out, 70);

        assert!(report.contains("Key indicators for 2020-05-03"));
        assert!(report.contains("new cases: 60"));
        assert!(report.contains("positivity rate: 4.00%"));
        assert!(report.contains("Infection rate for 2020-05-03: 1.02"));
        assert!(report.contains("90% CI 0.82-1.22"));
        assert!(report.contains("Rt trail (last 2 days): 1.10 1.02"));
    }

    #[test]
    fn test_report_without_snapshot() {
        let out = outcome(vec![record("2020-05-03", 1.02)]);
        let report = format_report(None, &out, 70);

        assert!(!report.contains("Key indicators"));
        assert!(report.contains("Infection rate for 2020-05-03"));
    }
}
