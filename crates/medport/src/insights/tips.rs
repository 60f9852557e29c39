use super::views::{HealthSummary, ImprovementTip, TipCategory, TipDifficulty};
use crate::reports::ReportType;

const TREND_TRACKING_RECENT_THRESHOLD: usize = 2;

const BASE_TIPS: [ImprovementTip; 5] = [
    ImprovementTip {
        id: "schedule-checkups",
        title: "Schedule regular checkups",
        description: "Routine visits catch changes before they turn into problems.",
        actionable: "Book your next annual checkup and add it to your calendar.",
        category: TipCategory::Prevention,
        difficulty: TipDifficulty::Easy,
    },
    ImprovementTip {
        id: "organize-reports",
        title: "Keep your reports organized",
        description: "A complete, well-labelled record saves time at every appointment.",
        actionable: "Upload any paper reports you still have and add a short description to each.",
        category: TipCategory::Organization,
        difficulty: TipDifficulty::Easy,
    },
    ImprovementTip {
        id: "emergency-access",
        title: "Prepare for emergency access",
        description: "Emergency staff work faster when your key reports are easy to reach.",
        actionable: "Choose a trusted contact and share your report access PIN with them.",
        category: TipCategory::Emergency,
        difficulty: TipDifficulty::Medium,
    },
    ImprovementTip {
        id: "lifestyle-data",
        title: "Add lifestyle information",
        description: "Sleep, activity and diet notes give context to clinical results.",
        actionable: "Record a weekly summary of exercise, sleep and diet alongside your reports.",
        category: TipCategory::Lifestyle,
        difficulty: TipDifficulty::Medium,
    },
    ImprovementTip {
        id: "second-opinions",
        title: "Consider second opinions",
        description: "Another specialist can confirm a diagnosis or suggest alternatives.",
        actionable: "Share relevant reports with a second doctor before major treatment decisions.",
        category: TipCategory::Consultation,
        difficulty: TipDifficulty::Medium,
    },
];

const TRACK_TRENDS: ImprovementTip = ImprovementTip {
    id: "track-trends",
    title: "Track your health trends",
    description: "Several recent reports make it possible to see how results move over time.",
    actionable: "Compare the values in your latest reports with earlier ones and note changes.",
    category: TipCategory::Monitoring,
    difficulty: TipDifficulty::Medium,
};

const LAB_TRACKING: ImprovementTip = ImprovementTip {
    id: "lab-tracking",
    title: "Monitor lab values",
    description: "Pathology results are most useful when read as a series.",
    actionable: "Keep a running list of key lab markers and their reference ranges.",
    category: TipCategory::Monitoring,
    difficulty: TipDifficulty::Easy,
};

const IMAGING_FOLLOWUP: ImprovementTip = ImprovementTip {
    id: "imaging-followup",
    title: "Follow up on imaging",
    description: "Imaging findings often come with a recommended re-check interval.",
    actionable: "Check each radiology report for follow-up recommendations and schedule them.",
    category: TipCategory::Prevention,
    difficulty: TipDifficulty::Medium,
};

/// Base catalogue first, then the conditional tips in catalogue order.
pub(crate) fn improvement_tips(summary: &HealthSummary) -> Vec<ImprovementTip> {
    let mut tips = BASE_TIPS.to_vec();

    if summary.recent_activity > TREND_TRACKING_RECENT_THRESHOLD {
        tips.push(TRACK_TRENDS);
    }
    if summary.has_report_type(&ReportType::Pathology) {
        tips.push(LAB_TRACKING);
    }
    if summary.has_report_type(&ReportType::Radiology) {
        tips.push(IMAGING_FOLLOWUP);
    }

    tips
}
