use chrono::{DateTime, Duration, TimeZone, Utc};
use medport::insights::{InsightType, ScoreFactor};
use medport::reports::{parse_timestamp, validate_records, PatientId, ReportId, ReportType};
use medport::{InsightsEngine, Report, ReportRecord};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 9, 0, 0).single().expect("valid evaluation instant")
}

fn report(id: &str, report_type: &str, hospital: &str, days_ago: i64) -> Report {
    Report {
        id: ReportId(id.to_string()),
        patient_id: PatientId("patient-1".to_string()),
        report_type: ReportType::from(report_type),
        hospital: hospital.to_string(),
        created_at: now() - Duration::days(days_ago),
        file_name: None,
        description: None,
    }
}

fn insight_ids(engine: &InsightsEngine<'_>) -> Vec<&'static str> {
    engine
        .generate_insights()
        .into_iter()
        .map(|insight| insight.id)
        .collect()
}

#[test]
fn empty_collection_has_zeroed_summary_and_base_score() {
    let engine = InsightsEngine::new(&[], now());
    let summary = engine.compute_summary();

    assert_eq!(summary.total_reports, 0);
    assert_eq!(summary.recent_activity, 0);
    assert!(summary.report_types.is_empty());
    assert_eq!(summary.average_reports_per_month, 0.0);
    assert_eq!(summary.last_report_date, None);
    assert_eq!(summary.most_common_hospital, "");

    assert!(engine.generate_insights().is_empty());
    assert_eq!(engine.key_metrics().health_score, 50);
    assert_eq!(engine.generate_improvement_tips().len(), 5);
}

#[test]
fn single_type_single_provider_history_without_recent_reports() {
    let reports: Vec<Report> = (0..6)
        .map(|i| report(&format!("r-{i}"), "radiology", "X", 100 + i * 10))
        .collect();
    let engine = InsightsEngine::new(&reports, now());

    assert_eq!(
        insight_ids(&engine),
        vec![
            "long-gap",
            "no-recent-activity",
            "limited-diversity",
            "single-provider",
        ]
    );

    let breakdown = engine.score_breakdown();
    assert!(breakdown
        .iter()
        .any(|adjustment| adjustment.factor == ScoreFactor::NoRecentActivity
            && adjustment.points == -15));
    assert!(!breakdown
        .iter()
        .any(|adjustment| adjustment.factor == ScoreFactor::TypeDiversity));

    // 6 reports over 5 months -> 1.2 per month
    let metrics = engine.key_metrics();
    assert_eq!(metrics.average_reports_per_month, 1.2);
    assert_eq!(metrics.health_score, 45);
    assert_eq!(metrics.warning_insights, 1);
    assert_eq!(metrics.positive_insights, 0);
    assert_eq!(metrics.total_insights, 4);
}

#[test]
fn diverse_recent_history_earns_positive_insights() {
    let reports = vec![
        report("r-1", "radiology", "North Clinic", 60),
        report("r-2", "pathology", "North Clinic", 45),
        report("r-3", "cardiology", "Heart Center", 35),
        report("r-4", "neurology", "North Clinic", 10),
        report("r-5", "radiology", "Heart Center", 2),
    ];
    let engine = InsightsEngine::new(&reports, now());
    let summary = engine.compute_summary();

    assert_eq!(summary.recent_activity, 2);
    assert_eq!(summary.average_reports_per_month, 2.5);
    assert_eq!(summary.most_common_hospital, "North Clinic");
    assert_eq!(
        insight_ids(&engine),
        vec!["comprehensive-monitoring", "active-monitoring"]
    );

    let metrics = engine.key_metrics();
    assert_eq!(metrics.positive_insights, 2);
    assert_eq!(metrics.health_score, 95);

    let tip_ids: Vec<_> = engine
        .generate_improvement_tips()
        .into_iter()
        .map(|tip| tip.id)
        .collect();
    assert!(tip_ids.contains(&"lab-tracking"));
    assert!(tip_ids.contains(&"imaging-followup"));
    assert!(!tip_ids.contains(&"track-trends"));
}

#[test]
fn extended_gap_penalty_applies_once() {
    let reports = vec![report("r-1", "cardiology", "Heart Center", 200)];
    let engine = InsightsEngine::new(&reports, now());

    let gap_penalties: Vec<i16> = engine
        .score_breakdown()
        .into_iter()
        .filter(|adjustment| adjustment.factor == ScoreFactor::ReportGap)
        .map(|adjustment| adjustment.points)
        .collect();
    assert_eq!(gap_penalties, vec![-20]);

    // 50 - 15 (no recent) - 10 (sparse) - 20 (gap)
    assert_eq!(engine.key_metrics().health_score, 5);
}

#[test]
fn total_matches_input_length_and_score_stays_bounded() {
    let types = ["radiology", "pathology", "cardiology", "neurology", "dermatology"];
    let hospitals = ["North Clinic", "Heart Center", "City Lab"];

    for size in 0..40usize {
        let reports: Vec<Report> = (0..size)
            .map(|i| {
                report(
                    &format!("r-{i}"),
                    types[(i * 7 + size) % types.len()],
                    hospitals[(i + size) % hospitals.len()],
                    ((i * 37 + size * 11) % 400) as i64,
                )
            })
            .collect();
        let engine = InsightsEngine::new(&reports, now());

        assert_eq!(engine.compute_summary().total_reports, size);
        let score = engine.key_metrics().health_score;
        assert!(score <= 100, "score {score} out of range for size {size}");

        let priorities: Vec<u8> = engine
            .generate_insights()
            .into_iter()
            .map(|insight| insight.priority)
            .collect();
        assert!(
            priorities.windows(2).all(|pair| pair[0] >= pair[1]),
            "insights not sorted by priority: {priorities:?}"
        );
    }
}

#[test]
fn repeated_calls_are_identical() {
    let reports = vec![
        report("r-1", "radiology", "X", 3),
        report("r-2", "pathology", "Y", 95),
        report("r-3", "pathology", "Y", 140),
        report("r-4", "neurology", "X", 1),
    ];
    let engine = InsightsEngine::new(&reports, now());

    assert_eq!(engine.generate_insights(), engine.generate_insights());
    assert_eq!(engine.compute_summary(), engine.compute_summary());
    assert_eq!(engine.dashboard(), engine.dashboard());
}

#[test]
fn adding_a_recent_report_increments_recent_activity() {
    let mut reports = vec![
        report("r-1", "radiology", "X", 45),
        report("r-2", "pathology", "X", 12),
    ];
    let before = InsightsEngine::new(&reports, now()).compute_summary();

    reports.push(report("r-3", "cardiology", "Y", 4));
    let after = InsightsEngine::new(&reports, now()).compute_summary();

    assert_eq!(after.recent_activity, before.recent_activity + 1);
    assert!(after.total_reports > before.total_reports);
}

#[test]
fn dashboard_agrees_with_individual_operations() {
    let reports = vec![
        report("r-1", "radiology", "X", 3),
        report("r-2", "radiology", "X", 8),
        report("r-3", "radiology", "X", 15),
        report("r-4", "radiology", "X", 20),
    ];
    let engine = InsightsEngine::new(&reports, now());
    let dashboard = engine.dashboard();

    assert_eq!(dashboard.summary, engine.compute_summary());
    assert_eq!(dashboard.insights, engine.generate_insights());
    assert_eq!(dashboard.tips, engine.generate_improvement_tips());
    assert_eq!(dashboard.metrics, engine.key_metrics());

    let net: i16 = dashboard
        .score_breakdown
        .iter()
        .map(|adjustment| adjustment.points)
        .sum();
    assert_eq!(i16::from(dashboard.metrics.health_score), 50 + net);
    assert!(dashboard
        .insights
        .iter()
        .any(|insight| insight.id == "increased-activity"
            && insight.insight_type == InsightType::Warning));
}

#[test]
fn rejected_records_never_reach_the_engine() {
    let records = vec![
        ReportRecord {
            id: Some("r-1".to_string()),
            patient_id: Some("patient-1".to_string()),
            report_type: Some("radiology".to_string()),
            hospital: Some("X".to_string()),
            created_at: Some("2025-09-20T10:00:00Z".to_string()),
            ..ReportRecord::default()
        },
        ReportRecord {
            id: Some("r-2".to_string()),
            report_type: Some("pathology".to_string()),
            hospital: Some("X".to_string()),
            created_at: Some("20/09/2025".to_string()),
            ..ReportRecord::default()
        },
    ];

    let batch = validate_records(records);
    assert_eq!(batch.rejected.len(), 1);
    assert_eq!(batch.rejected[0].index, 1);

    let engine = InsightsEngine::new(&batch.reports, now());
    let summary = engine.compute_summary();
    assert_eq!(summary.total_reports, 1);
    assert!(!summary.report_types.contains_key("pathology"));
}

#[test]
fn insight_payload_uses_type_key() {
    let reports = vec![report("r-1", "radiology", "X", 120)];
    let engine = InsightsEngine::new(&reports, now());
    let json = serde_json::to_value(engine.generate_insights()).expect("serializes");

    assert_eq!(json[0]["id"], "long-gap");
    assert_eq!(json[0]["type"], "warning");
    assert_eq!(json[0]["category"], "gaps");
    assert_eq!(json[0]["priority"], 3);
}

#[test]
fn extreme_evaluation_instant_still_produces_a_dashboard() {
    let batch = validate_records(vec![ReportRecord {
        id: Some("r-1".to_string()),
        report_type: Some("radiology".to_string()),
        hospital: Some("X".to_string()),
        created_at: Some("2025-09-20T10:00:00Z".to_string()),
        ..ReportRecord::default()
    }]);
    let earliest = parse_timestamp("-262143-01-15").expect("lowest supported date parses");

    let dashboard = InsightsEngine::new(&batch.reports, earliest).dashboard();

    assert_eq!(dashboard.generated_at, earliest);
    assert_eq!(dashboard.summary.total_reports, 1);
    assert!(dashboard.metrics.health_score <= 100);
}
