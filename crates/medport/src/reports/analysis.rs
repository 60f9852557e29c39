//! Canned report analysis shown when no language model is wired in. The
//! template depends only on the report type, never on the document contents.

use super::{Report, ReportId, ReportType};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const ANALYSIS_DISCLAIMER: &str = "Automated overview based on the report category only. \
It does not read the document and is not a diagnosis; discuss results with your doctor.";

#[derive(Debug, Clone, Serialize)]
pub struct ReportAnalysis {
    pub report_id: ReportId,
    pub report_type: ReportType,
    pub hospital: String,
    pub report_date: DateTime<Utc>,
    pub headline: String,
    pub findings: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
    pub disclaimer: &'static str,
}

struct AnalysisTemplate {
    focus: &'static str,
    findings: &'static [&'static str],
    recommendations: &'static [&'static str],
}

const RADIOLOGY: AnalysisTemplate = AnalysisTemplate {
    focus: "imaging study",
    findings: &[
        "Imaging studies describe structure: look for the impression section first",
        "Terms such as 'unremarkable' or 'within normal limits' indicate no notable finding",
        "Comparison with prior imaging is the usual way changes are assessed",
    ],
    recommendations: &[
        "Keep prior scans from the same body region together for comparison",
        "Ask whether any follow-up imaging interval was recommended",
    ],
};

const PATHOLOGY: AnalysisTemplate = AnalysisTemplate {
    focus: "laboratory or tissue analysis",
    findings: &[
        "Values are reported against a reference range printed next to each result",
        "Flags such as H or L mark results outside the laboratory's reference range",
        "A single out-of-range value is usually interpreted together with earlier results",
    ],
    recommendations: &[
        "Track repeated markers over time instead of reading one result in isolation",
        "Confirm whether fasting or medication timing affected the sample",
    ],
};

const CARDIOLOGY: AnalysisTemplate = AnalysisTemplate {
    focus: "heart function assessment",
    findings: &[
        "Cardiology reports typically summarise rhythm, rate and pumping function",
        "Ejection fraction, when present, describes how much blood each beat moves",
    ],
    recommendations: &[
        "Record blood pressure and heart rate readings between visits",
        "Bring a current medication list to the next cardiology appointment",
    ],
};

const NEUROLOGY: AnalysisTemplate = AnalysisTemplate {
    focus: "nervous system evaluation",
    findings: &[
        "Neurology reports combine examination notes with any imaging or EEG results",
        "Symptom descriptions and their timing are central to the assessment",
    ],
    recommendations: &[
        "Keep a symptom diary with dates, duration and triggers",
        "Ask which findings need monitoring and at what interval",
    ],
};

const GENERAL: AnalysisTemplate = AnalysisTemplate {
    focus: "medical report",
    findings: &["The summary or conclusion section carries the clinician's main interpretation"],
    recommendations: &[
        "File the report with related documents from the same provider",
        "Note any follow-up actions and their due dates",
    ],
};

fn template_for(report_type: &ReportType) -> &'static AnalysisTemplate {
    match report_type {
        ReportType::Radiology => &RADIOLOGY,
        ReportType::Pathology => &PATHOLOGY,
        ReportType::Cardiology => &CARDIOLOGY,
        ReportType::Neurology => &NEUROLOGY,
        ReportType::Other(_) => &GENERAL,
    }
}

pub fn analyze_report(report: &Report) -> ReportAnalysis {
    let template = template_for(&report.report_type);

    ReportAnalysis {
        report_id: report.id.clone(),
        report_type: report.report_type.clone(),
        hospital: report.hospital.clone(),
        report_date: report.created_at,
        headline: format!(
            "{} {} from {} on {}",
            report.report_type.label(),
            template.focus,
            report.hospital,
            report.created_at.format("%Y-%m-%d")
        ),
        findings: template.findings.to_vec(),
        recommendations: template.recommendations.to_vec(),
        disclaimer: ANALYSIS_DISCLAIMER,
    }
}
