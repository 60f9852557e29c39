use super::views::HealthSummary;
use crate::reports::Report;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

pub(crate) const RECENT_WINDOW_DAYS: i64 = 30;
const DAYS_PER_MONTH: f64 = 30.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub(crate) fn summarize(reports: &[Report], now: DateTime<Utc>) -> HealthSummary {
    if reports.is_empty() {
        return HealthSummary::empty();
    }

    let total_reports = reports.len();
    let recent_cutoff = now
        .checked_sub_signed(Duration::days(RECENT_WINDOW_DAYS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let recent_activity = reports
        .iter()
        .filter(|report| report.created_at >= recent_cutoff)
        .count();

    let mut report_types = BTreeMap::new();
    for report in reports {
        *report_types
            .entry(report.report_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    let earliest = reports.iter().map(|report| report.created_at).min();
    let last_report_date = reports.iter().map(|report| report.created_at).max();

    let average_reports_per_month = earliest
        .map(|earliest| {
            let months = months_between(earliest, now).max(1.0);
            round_one_decimal(total_reports as f64 / months)
        })
        .unwrap_or(0.0);

    let most_common_hospital = most_common(reports.iter().map(|report| report.hospital.as_str()))
        .unwrap_or_default()
        .to_string();

    HealthSummary {
        total_reports,
        recent_activity,
        report_types,
        average_reports_per_month,
        last_report_date,
        most_common_hospital,
    }
}

/// Whole days elapsed since the most recent report, if there is one.
pub(crate) fn days_since(last_report_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    last_report_date.map(|last| (now - last).num_days())
}

pub(crate) fn distinct_hospitals(reports: &[Report]) -> usize {
    reports
        .iter()
        .map(|report| report.hospital.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn months_between(earliest: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - earliest).num_milliseconds() as f64 / (DAYS_PER_MONTH * MILLIS_PER_DAY)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Ties go to whichever value appeared first in the input.
fn most_common<'r>(values: impl Iterator<Item = &'r str>) -> Option<&'r str> {
    let mut counts: HashMap<&'r str, usize> = HashMap::new();
    let mut first_seen: Vec<&'r str> = Vec::new();

    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&'r str, usize)> = None;
    for value in first_seen {
        let count = counts.get(value).copied().unwrap_or(0);
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}
