use super::views::{
    HealthInsight, HealthSummary, InsightType, KeyMetrics, ScoreAdjustment, ScoreFactor,
};
use super::Signals;

pub(crate) const BASE_SCORE: i16 = 50;

const STEADY_MONTHLY_AVERAGE: f64 = 1.0;
const SPARSE_MONTHLY_AVERAGE: f64 = 0.3;
const DIVERSE_TYPE_COUNT: usize = 2;
const ESTABLISHED_HISTORY: usize = 5;
const EXTENDED_GAP_DAYS: i64 = 180;
const GAP_DAYS: i64 = 90;

/// Every adjustment that applies, in evaluation order. None of them short-circuit.
pub(crate) fn score_adjustments(signals: &Signals) -> Vec<ScoreAdjustment> {
    let mut adjustments = Vec::new();

    if signals.recent_activity > 0 {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::RecentActivity,
            points: 10,
            notes: format!("{} report(s) in the last 30 days", signals.recent_activity),
        });
    }

    if signals.average_reports_per_month >= STEADY_MONTHLY_AVERAGE {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::MonitoringFrequency,
            points: 10,
            notes: format!(
                "{:.1} reports per month meets the {:.1} baseline",
                signals.average_reports_per_month, STEADY_MONTHLY_AVERAGE
            ),
        });
    }

    if signals.distinct_types >= DIVERSE_TYPE_COUNT {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::TypeDiversity,
            points: 15,
            notes: format!("{} report categories on file", signals.distinct_types),
        });
    }

    if signals.total_reports >= ESTABLISHED_HISTORY {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::HistoryDepth,
            points: 10,
            notes: format!("{} reports on file", signals.total_reports),
        });
    }

    if signals.recent_activity == 0 && signals.total_reports > 0 {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::NoRecentActivity,
            points: -15,
            notes: "no reports in the last 30 days".to_string(),
        });
    }

    // An empty history has an average of zero but nothing to penalise.
    if signals.total_reports > 0 && signals.average_reports_per_month < SPARSE_MONTHLY_AVERAGE {
        adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::InfrequentMonitoring,
            points: -10,
            notes: format!(
                "{:.1} reports per month is below {:.1}",
                signals.average_reports_per_month, SPARSE_MONTHLY_AVERAGE
            ),
        });
    }

    match signals.days_since_last_report {
        Some(days) if days > EXTENDED_GAP_DAYS => adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::ReportGap,
            points: -20,
            notes: format!("{days} days since the last report"),
        }),
        Some(days) if days > GAP_DAYS => adjustments.push(ScoreAdjustment {
            factor: ScoreFactor::ReportGap,
            points: -10,
            notes: format!("{days} days since the last report"),
        }),
        _ => {}
    }

    adjustments
}

pub(crate) fn health_score(adjustments: &[ScoreAdjustment]) -> u8 {
    let total: i16 = adjustments
        .iter()
        .map(|adjustment| adjustment.points)
        .sum();
    (BASE_SCORE + total).clamp(0, 100) as u8
}

pub(crate) fn key_metrics(
    summary: &HealthSummary,
    insights: &[HealthInsight],
    adjustments: &[ScoreAdjustment],
) -> KeyMetrics {
    let count_of = |kind: InsightType| {
        insights
            .iter()
            .filter(|insight| insight.insight_type == kind)
            .count()
    };

    KeyMetrics {
        health_score: health_score(adjustments),
        total_insights: insights.len(),
        critical_insights: count_of(InsightType::Critical),
        warning_insights: count_of(InsightType::Warning),
        positive_insights: count_of(InsightType::Positive),
        average_reports_per_month: summary.average_reports_per_month,
        recent_activity: summary.recent_activity,
    }
}
