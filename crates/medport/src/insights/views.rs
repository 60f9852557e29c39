use crate::reports::ReportType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub total_reports: usize,
    pub recent_activity: usize,
    pub report_types: BTreeMap<String, usize>,
    pub average_reports_per_month: f64,
    pub last_report_date: Option<DateTime<Utc>>,
    pub most_common_hospital: String,
}

impl HealthSummary {
    pub fn empty() -> Self {
        Self {
            total_reports: 0,
            recent_activity: 0,
            report_types: BTreeMap::new(),
            average_reports_per_month: 0.0,
            last_report_date: None,
            most_common_hospital: String::new(),
        }
    }

    pub fn has_report_type(&self, report_type: &ReportType) -> bool {
        self.report_types.contains_key(report_type.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Positive,
    Warning,
    Info,
    Critical,
}

impl InsightType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Frequency,
    Trends,
    Gaps,
    Recommendations,
}

impl InsightCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Frequency => "Frequency",
            Self::Trends => "Trends",
            Self::Gaps => "Gaps",
            Self::Recommendations => "Recommendations",
        }
    }
}

/// Rule-derived observation. `priority` runs 1 (low) to 5 (high).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthInsight {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub category: InsightCategory,
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Prevention,
    Organization,
    Emergency,
    Lifestyle,
    Consultation,
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipDifficulty {
    Easy,
    Medium,
    Hard,
}

impl TipDifficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementTip {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub actionable: &'static str,
    pub category: TipCategory,
    pub difficulty: TipDifficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    RecentActivity,
    MonitoringFrequency,
    TypeDiversity,
    HistoryDepth,
    NoRecentActivity,
    InfrequentMonitoring,
    ReportGap,
}

/// One line of the health score, kept so the total can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub factor: ScoreFactor,
    pub points: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub health_score: u8,
    pub total_insights: usize,
    pub critical_insights: usize,
    pub warning_insights: usize,
    pub positive_insights: usize,
    pub average_reports_per_month: f64,
    pub recent_activity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDashboard {
    pub generated_at: DateTime<Utc>,
    pub summary: HealthSummary,
    pub insights: Vec<HealthInsight>,
    pub tips: Vec<ImprovementTip>,
    pub metrics: KeyMetrics,
    pub score_breakdown: Vec<ScoreAdjustment>,
}
