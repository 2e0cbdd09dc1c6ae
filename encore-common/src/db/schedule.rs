//! Past/upcoming classification
//!
//! A show is past when its start_time's date is strictly before today;
//! otherwise it is upcoming. A show later today is upcoming.

use chrono::{NaiveDate, NaiveDateTime};

/// True when `start_time` falls on a date strictly before `today`
pub fn is_past(start_time: NaiveDateTime, today: NaiveDate) -> bool {
    start_time.date() < today
}

/// Partition shows into (past, upcoming), preserving input order within
/// each partition
pub fn partition_by_date<T>(
    shows: Vec<T>,
    start_time: impl Fn(&T) -> NaiveDateTime,
    today: NaiveDate,
) -> (Vec<T>, Vec<T>) {
    shows
        .into_iter()
        .partition(|show| is_past(start_time(show), today))
}
