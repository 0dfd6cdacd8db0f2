//! Validated cumulative case series.
//!
//! [`CaseSeries`] is the input contract for the estimation core: dates are
//! strictly increasing and cumulative counts never decrease. Construction
//! fails fast on malformed data so the estimator never sees it.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("dates out of order at {0}: must be strictly increasing")]
    OutOfOrder(NaiveDate),

    #[error("cumulative count decreases at {date}: {previous} -> {current}")]
    Decreasing {
        date: NaiveDate,
        previous: u64,
        current: u64,
    },
}

/// An ordered (date, cumulative count) series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSeries {
    dates: Vec<NaiveDate>,
    counts: Vec<u64>,
}

impl CaseSeries {
    /// Builds a cumulative series from date-sorted pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError`] if the pairs are empty, contain duplicate or
    /// out-of-order dates, or the counts ever decrease.
    pub fn cumulative(pairs: Vec<(NaiveDate, u64)>) -> Result<Self, SeriesError> {
        if pairs.is_empty() {
            return Err(SeriesError::Empty);
        }

        for window in pairs.windows(2) {
            let (prev_date, prev_count) = window[0];
            let (date, count) = window[1];

            if date == prev_date {
                return Err(SeriesError::DuplicateDate(date));
            }
            if date < prev_date {
                return Err(SeriesError::OutOfOrder(date));
            }
            if count < prev_count {
                return Err(SeriesError::Decreasing {
                    date,
                    previous: prev_count,
                    current: count,
                });
            }
        }

        let (dates, counts) = pairs.into_iter().unzip();
        Ok(Self { dates, counts })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.dates.iter().copied().zip(self.counts.iter().copied())
    }

    /// Last two entries, if the series has at least two. Used for the
    /// latest-day delta in reporting.
    pub fn last_pair(&self) -> Option<((NaiveDate, u64), (NaiveDate, u64))> {
        let n = self.len();
        if n < 2 {
            return None;
        }
        Some((
            (self.dates[n - 2], self.counts[n - 2]),
            (self.dates[n - 1], self.counts[n - 1]),
        ))
    }
}
