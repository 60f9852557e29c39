use super::views::{HealthInsight, InsightCategory, InsightType};
use super::Signals;

const BUSY_RECENT_THRESHOLD: usize = 3;
const LIMITED_DIVERSITY_MIN_REPORTS: usize = 5;
const COMPREHENSIVE_TYPE_COUNT: usize = 4;
const ACTIVE_MONTHLY_AVERAGE: f64 = 2.0;
const INFREQUENT_MONTHLY_AVERAGE: f64 = 0.5;
const PATTERN_MIN_REPORTS: usize = 3;
const LONG_GAP_DAYS: i64 = 90;

/// A single threshold check and the insight it produces when it holds.
pub(crate) struct InsightRule {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
    pub(crate) insight_type: InsightType,
    pub(crate) category: InsightCategory,
    pub(crate) priority: u8,
    pub(crate) applies: fn(&Signals) -> bool,
    pub(crate) describe: fn(&Signals) -> String,
}

impl InsightRule {
    pub(crate) fn evaluate(&self, signals: &Signals) -> Option<HealthInsight> {
        if !(self.applies)(signals) {
            return None;
        }

        Some(HealthInsight {
            id: self.id,
            title: self.title,
            description: (self.describe)(signals),
            insight_type: self.insight_type,
            category: self.category,
            priority: self.priority,
        })
    }
}

/// Evaluated in this order; ties in priority keep this order after sorting.
pub(crate) const INSIGHT_RULES: [InsightRule; 8] = [
    InsightRule {
        id: "no-recent-activity",
        title: "No recent activity",
        insight_type: InsightType::Info,
        category: InsightCategory::Gaps,
        priority: 2,
        applies: no_recent_activity,
        describe: describe_no_recent_activity,
    },
    InsightRule {
        id: "increased-activity",
        title: "Increased activity",
        insight_type: InsightType::Warning,
        category: InsightCategory::Trends,
        priority: 3,
        applies: increased_activity,
        describe: describe_increased_activity,
    },
    InsightRule {
        id: "limited-diversity",
        title: "Limited report diversity",
        insight_type: InsightType::Info,
        category: InsightCategory::Recommendations,
        priority: 2,
        applies: limited_diversity,
        describe: describe_limited_diversity,
    },
    InsightRule {
        id: "comprehensive-monitoring",
        title: "Comprehensive monitoring",
        insight_type: InsightType::Positive,
        category: InsightCategory::Trends,
        priority: 1,
        applies: comprehensive_monitoring,
        describe: describe_comprehensive_monitoring,
    },
    InsightRule {
        id: "active-monitoring",
        title: "Active health monitoring",
        insight_type: InsightType::Positive,
        category: InsightCategory::Frequency,
        priority: 1,
        applies: active_monitoring,
        describe: describe_active_monitoring,
    },
    InsightRule {
        id: "infrequent-monitoring",
        title: "Infrequent monitoring",
        insight_type: InsightType::Info,
        category: InsightCategory::Frequency,
        priority: 3,
        applies: infrequent_monitoring,
        describe: describe_infrequent_monitoring,
    },
    InsightRule {
        id: "single-provider",
        title: "Single healthcare provider",
        insight_type: InsightType::Info,
        category: InsightCategory::Recommendations,
        priority: 2,
        applies: single_provider,
        describe: describe_single_provider,
    },
    InsightRule {
        id: "long-gap",
        title: "Long gap since last report",
        insight_type: InsightType::Warning,
        category: InsightCategory::Gaps,
        priority: 3,
        applies: long_gap,
        describe: describe_long_gap,
    },
];

pub(crate) fn evaluate_rules(signals: &Signals) -> Vec<HealthInsight> {
    let mut insights: Vec<HealthInsight> = INSIGHT_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(signals))
        .collect();

    // `sort_by` is stable, so equal priorities stay in table order.
    insights.sort_by(|a, b| b.priority.cmp(&a.priority));
    insights
}

fn no_recent_activity(signals: &Signals) -> bool {
    signals.recent_activity == 0 && signals.total_reports > 0
}

fn describe_no_recent_activity(_signals: &Signals) -> String {
    "No reports were added in the last 30 days. Upload new results after your next visit so \
     your record stays current."
        .to_string()
}

fn increased_activity(signals: &Signals) -> bool {
    signals.recent_activity > BUSY_RECENT_THRESHOLD
}

fn describe_increased_activity(signals: &Signals) -> String {
    format!(
        "{} reports were added in the last 30 days. Make sure your care team has reviewed the \
         latest results together.",
        signals.recent_activity
    )
}

fn limited_diversity(signals: &Signals) -> bool {
    signals.distinct_types == 1 && signals.total_reports > LIMITED_DIVERSITY_MIN_REPORTS
}

fn describe_limited_diversity(signals: &Signals) -> String {
    match &signals.sole_report_type {
        Some(report_type) => format!(
            "All {} reports are {} reports. Other routine checkups may be missing from your record.",
            signals.total_reports, report_type
        ),
        None => format!(
            "All {} reports share one category. Other routine checkups may be missing from your record.",
            signals.total_reports
        ),
    }
}

fn comprehensive_monitoring(signals: &Signals) -> bool {
    signals.distinct_types >= COMPREHENSIVE_TYPE_COUNT
}

fn describe_comprehensive_monitoring(signals: &Signals) -> String {
    format!(
        "Your record covers {} report categories, giving a broad view of your health.",
        signals.distinct_types
    )
}

fn active_monitoring(signals: &Signals) -> bool {
    signals.average_reports_per_month > ACTIVE_MONTHLY_AVERAGE
}

fn describe_active_monitoring(signals: &Signals) -> String {
    format!(
        "You average {:.1} reports per month, which keeps your history up to date.",
        signals.average_reports_per_month
    )
}

fn infrequent_monitoring(signals: &Signals) -> bool {
    signals.average_reports_per_month < INFREQUENT_MONTHLY_AVERAGE
        && signals.total_reports > PATTERN_MIN_REPORTS
}

fn describe_infrequent_monitoring(signals: &Signals) -> String {
    format!(
        "You average {:.1} reports per month. Regular checkups make changes easier to spot early.",
        signals.average_reports_per_month
    )
}

fn single_provider(signals: &Signals) -> bool {
    signals.distinct_hospitals == 1 && signals.total_reports > PATTERN_MIN_REPORTS
}

fn describe_single_provider(signals: &Signals) -> String {
    format!(
        "All {} reports come from {}. A second opinion can be worthwhile for major decisions.",
        signals.total_reports, signals.most_common_hospital
    )
}

fn long_gap(signals: &Signals) -> bool {
    signals
        .days_since_last_report
        .map_or(false, |days| days > LONG_GAP_DAYS)
}

fn describe_long_gap(signals: &Signals) -> String {
    format!(
        "It has been {} days since your last report. Consider booking a follow-up appointment.",
        signals.days_since_last_report.unwrap_or_default()
    )
}
