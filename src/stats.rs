//! Latest-day summary indicators for reporting.

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::CaseSeries;

/// Key indicators for the most recent date in the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub new_cases: u64,
    pub new_tests: Option<u64>,
    /// Share of the day's tests that came back positive, as a percent.
    pub positivity_percent: Option<f64>,
    pub cases_per_100k: f64,
}

impl DailySnapshot {
    /// Builds the snapshot from the cumulative series.
    ///
    /// Returns `None` when the case series has fewer than two entries, as a
    /// single day has no delta to report. A tests series that does not end
    /// on the same date as the cases is ignored.
    pub fn from_series(
        cases: &CaseSeries,
        tests: Option<&CaseSeries>,
        population: u64,
    ) -> Option<Self> {
        let ((_, prev_cases), (date, total_cases)) = cases.last_pair()?;
        let new_cases = total_cases - prev_cases;

        let new_tests = tests
            .and_then(CaseSeries::last_pair)
            .filter(|&(_, (test_date, _))| test_date == date)
            .map(|((_, prev), (_, total))| total - prev);

        let positivity_percent = new_tests.map(|t| Self::pct(new_cases, t));

        Some(Self {
            date,
            new_cases,
            new_tests,
            positivity_percent,
            cases_per_100k: new_cases as f64 / population as f64 * 100_000.0,
        })
    }

    /// Percentage of `part` in `total`; 0.0 when `total` is 0.
    pub fn pct(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(counts: &[u64]) -> CaseSeries {
        let start: NaiveDate = "2020-05-01".parse().unwrap();
        let pairs = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (start + chrono::Days::new(i as u64), c))
            .collect();
        CaseSeries::cumulative(pairs).unwrap()
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(DailySnapshot::pct(10, 0), 0.0);
    }

    #[test]
    fn test_snapshot_deltas() {
        let cases = series(&[100, 150, 210]);
        let tests = series(&[1000, 2000, 3500]);

        let snap = DailySnapshot::from_series(&cases, Some(&tests), 1_000_000).unwrap();

        assert_eq!(snap.date, "2020-05-03".parse().unwrap());
        assert_eq!(snap.new_cases, 60);
        assert_eq!(snap.new_tests, Some(1500));
        assert!((snap.positivity_percent.unwrap() - 4.0).abs() < 1e-12);
        assert!((snap.cases_per_100k - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_without_tests() {
        let cases = series(&[100, 150]);
        let snap = DailySnapshot::from_series(&cases, None, 1_000_000).unwrap();

        assert!(snap.new_tests.is_none());
        assert!(snap.positivity_percent.is_none());
    }

    #[test]
    fn test_single_day_has_no_snapshot() {
        let cases = series(&[100]);
        assert!(DailySnapshot::from_series(&cases, None, 1_000_000).is_none());
    }

    #[test]
    fn test_misaligned_tests_ignored() {
        // Tests series ends a day early: its delta would describe the
        // wrong date, so it is dropped.
        let cases = series(&[100, 150, 210]);
        let tests = series(&[1000, 2000]);

        let snap = DailySnapshot::from_series(&cases, Some(&tests), 1_000_000).unwrap();
        assert!(snap.new_tests.is_none());
    }
}
