//! Health summary, rule-based insights, improvement tips and the 0–100 health
//! score, all derived from a patient's report metadata.
//!
//! Everything here is a pure function of the report slice and the evaluation
//! instant handed to [`InsightsEngine::new`]; nothing is cached between calls.

mod rules;
mod score;
mod summary;
mod tips;
pub mod views;

pub use views::{
    HealthDashboard, HealthInsight, HealthSummary, ImprovementTip, InsightCategory, InsightType,
    KeyMetrics, ScoreAdjustment, ScoreFactor, TipCategory, TipDifficulty,
};

use crate::reports::Report;
use chrono::{DateTime, Utc};

/// Aggregate figures the insight rules and score adjustments read from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Signals {
    pub(crate) total_reports: usize,
    pub(crate) recent_activity: usize,
    pub(crate) distinct_types: usize,
    pub(crate) distinct_hospitals: usize,
    pub(crate) average_reports_per_month: f64,
    pub(crate) days_since_last_report: Option<i64>,
    pub(crate) most_common_hospital: String,
    pub(crate) sole_report_type: Option<String>,
}

impl Signals {
    fn collect(summary: &HealthSummary, reports: &[Report], now: DateTime<Utc>) -> Self {
        let sole_report_type = if summary.report_types.len() == 1 {
            summary.report_types.keys().next().cloned()
        } else {
            None
        };

        Self {
            total_reports: summary.total_reports,
            recent_activity: summary.recent_activity,
            distinct_types: summary.report_types.len(),
            distinct_hospitals: summary::distinct_hospitals(reports),
            average_reports_per_month: summary.average_reports_per_month,
            days_since_last_report: summary::days_since(summary.last_report_date, now),
            most_common_hospital: summary.most_common_hospital.clone(),
            sole_report_type,
        }
    }
}

pub struct InsightsEngine<'a> {
    reports: &'a [Report],
    now: DateTime<Utc>,
}

impl<'a> InsightsEngine<'a> {
    pub fn new(reports: &'a [Report], now: DateTime<Utc>) -> Self {
        Self { reports, now }
    }

    pub fn compute_summary(&self) -> HealthSummary {
        summary::summarize(self.reports, self.now)
    }

    /// Insights sorted by descending priority.
    pub fn generate_insights(&self) -> Vec<HealthInsight> {
        let summary = self.compute_summary();
        rules::evaluate_rules(&self.signals(&summary))
    }

    pub fn generate_improvement_tips(&self) -> Vec<ImprovementTip> {
        tips::improvement_tips(&self.compute_summary())
    }

    pub fn score_breakdown(&self) -> Vec<ScoreAdjustment> {
        let summary = self.compute_summary();
        score::score_adjustments(&self.signals(&summary))
    }

    pub fn key_metrics(&self) -> KeyMetrics {
        let summary = self.compute_summary();
        let signals = self.signals(&summary);
        let insights = rules::evaluate_rules(&signals);
        let adjustments = score::score_adjustments(&signals);
        score::key_metrics(&summary, &insights, &adjustments)
    }

    /// Summary, insights, tips, metrics and score breakdown from a single pass.
    pub fn dashboard(&self) -> HealthDashboard {
        let summary = self.compute_summary();
        let signals = self.signals(&summary);
        let insights = rules::evaluate_rules(&signals);
        let score_breakdown = score::score_adjustments(&signals);
        let metrics = score::key_metrics(&summary, &insights, &score_breakdown);
        let tips = tips::improvement_tips(&summary);

        HealthDashboard {
            generated_at: self.now,
            summary,
            insights,
            tips,
            metrics,
            score_breakdown,
        }
    }

    fn signals(&self, summary: &HealthSummary) -> Signals {
        Signals::collect(summary, self.reports, self.now)
    }
}
