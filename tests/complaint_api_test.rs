// ==========================================
// ComplaintApi 集成测试 (内存传输层)
// ==========================================

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use serde_json::json;

use helpers::mock_transport::MockTransport;
use helpers::test_data_builder::{category, complaint_json, rule, session_for};
use quicklog_quality::api::endpoints;
use quicklog_quality::api::{ApiError, ComplaintApi, ComplaintFilter, ErrorKind, Method};
use quicklog_quality::domain::{ComplaintDraft, RateStatus, RateThresholds, SeverityLevel, ThresholdConfig};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

fn setup() -> (Arc<MockTransport>, ComplaintApi) {
    let transport = Arc::new(MockTransport::new());
    let api = ComplaintApi::new(transport.clone());
    (transport, api)
}

#[tokio::test]
async fn test_list_complaints_sorted_and_filtered() {
    let (transport, api) = setup();
    transport.respond(
        Method::Get,
        endpoints::COMPLAINTS,
        json!({ "data": [
            complaint_json(1, day(3), 1, false),
            complaint_json(2, day(9), 3, true),
            complaint_json(3, day(5), 2, true),
        ]}),
    );

    let all = api
        .list_complaints(&ComplaintFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let filter = ComplaintFilter {
        from: Some(day(1)),
        capa_only: true,
        ..Default::default()
    };
    let capa = api.list_complaints(&filter).await.unwrap();
    assert_eq!(capa.len(), 2);

    let last = transport.requests().pop().unwrap();
    assert_eq!(last.query, vec![("from".to_string(), "2026-01-01".to_string())]);
}

#[tokio::test]
async fn test_create_applies_severity3_rule_and_capa() {
    let (transport, api) = setup();
    transport.respond(
        Method::Post,
        endpoints::COMPLAINTS,
        complaint_json(42, day(10), 3, true),
    );

    let mut critical = rule(11, 1, "Glass fragment", SeverityLevel::S1);
    critical.always_severity3 = true;
    let rules = vec![critical];

    let mut draft = ComplaintDraft::new(day(10));
    draft.category_id = Some(1);
    draft.guidance_rule_id = Some(11);
    draft.notes = Some("   ".to_string());

    let created = api
        .create_complaint(&session_for("OPERATOR"), &draft, &rules)
        .await
        .unwrap();
    assert_eq!(created.id, 42);

    let sent = transport.requests_to(Method::Post, endpoints::COMPLAINTS);
    assert_eq!(sent.len(), 1);
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["severityLevel"], json!(3));
    assert_eq!(body["capaRequired"], json!(true));
    assert_eq!(body["guidanceRuleId"], json!(11));
    assert!(body["notes"].is_null());
}

#[tokio::test]
async fn test_viewer_cannot_create() {
    let (transport, api) = setup();
    let mut draft = ComplaintDraft::new(day(10));
    draft.category_id = Some(1);

    let err = api
        .create_complaint(&session_for("VIEWER"), &draft, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_entry_never_reaches_backend() {
    let (transport, api) = setup();

    let mut future = ComplaintDraft::new(Local::now().date_naive() + Duration::days(30));
    future.category_id = None;

    let err = api
        .create_complaint(&session_for("ADMIN"), &future, &[])
        .await
        .unwrap_err();
    match err {
        ApiError::EntryValidationError { violations, .. } => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert!(fields.contains(&"categoryId"));
            assert!(fields.contains(&"complaint_date"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // 规则与所选类别不符
    let rules = vec![rule(5, 2, "Taste off", SeverityLevel::S1)];
    let mut mismatched = ComplaintDraft::new(day(4));
    mismatched.category_id = Some(1);
    mismatched.guidance_rule_id = Some(5);
    assert!(api
        .create_complaint(&session_for("ADMIN"), &mismatched, &rules)
        .await
        .is_err());

    assert_eq!(transport.write_count(), 0);
}

#[tokio::test]
async fn test_delete_requires_manager() {
    let (transport, api) = setup();
    transport.respond(Method::Delete, &endpoints::item(endpoints::COMPLAINTS, 7), json!(null));

    assert!(api.delete_complaint(&session_for("OPERATOR"), 7).await.is_err());
    api.delete_complaint(&session_for("MANAGER"), 7).await.unwrap();
    assert_eq!(transport.write_count(), 1);
}

#[tokio::test]
async fn test_dashboard_uses_saved_thresholds() {
    let (transport, api) = setup();
    transport.respond(
        Method::Get,
        endpoints::COMPLAINTS_SUMMARY_WIDGET,
        json!({
            "config": { "version": 1, "complaintsPer10k": { "greenMax": 3.0, "amberMax": 5.0 } },
            "data": {
                "months": [
                    { "month": "2026-01", "complaints": 5, "unitsProduced": 20000.0 },
                    { "month": "2026-02", "complaints": 2, "unitsProduced": 0.0 }
                ],
                "byCategory": [ { "categoryId": 1, "count": 7 } ]
            }
        }),
    );

    let dashboard = api
        .load_dashboard(&[category(1, "Foreign body", 1)])
        .await
        .unwrap();
    assert_eq!(dashboard.thresholds.complaints_per_10k.green_max, 3.0);
    assert_eq!(dashboard.trend.points[0].status, RateStatus::Green);
    assert_eq!(dashboard.trend.points[1].status, RateStatus::Indeterminate);
    assert_eq!(dashboard.trend.categories[0].label, "Foreign body");
}

#[tokio::test]
async fn test_dashboard_without_config_uses_defaults() {
    let (transport, api) = setup();
    transport.respond(Method::Get, endpoints::COMPLAINTS_SUMMARY_WIDGET, json!({}));

    let dashboard = api.load_dashboard(&[]).await.unwrap();
    assert_eq!(dashboard.thresholds, ThresholdConfig::default());
    assert!(dashboard.trend.points.is_empty());
}

#[tokio::test]
async fn test_save_thresholds() {
    let (transport, api) = setup();
    transport.respond(Method::Put, endpoints::COMPLAINTS_SUMMARY_WIDGET, json!({}));

    let inverted = ThresholdConfig {
        complaints_per_10k: RateThresholds::new(4.0, 2.0),
    };
    let err = api
        .save_thresholds(&session_for("MANAGER"), &inverted)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let config = ThresholdConfig {
        complaints_per_10k: RateThresholds::new(1.5, 2.5),
    };
    assert!(api.save_thresholds(&session_for("OPERATOR"), &config).await.is_err());
    api.save_thresholds(&session_for("MANAGER"), &config)
        .await
        .unwrap();

    let sent = transport.requests_to(Method::Put, endpoints::COMPLAINTS_SUMMARY_WIDGET);
    assert_eq!(sent.len(), 1);
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["config"]["version"], json!(1));
    assert_eq!(body["config"]["complaintsPer10k"]["amberMax"], json!(2.5));
}

#[tokio::test]
async fn test_backend_failure_is_fetch_error() {
    let (transport, api) = setup();
    transport.fail(Method::Get, endpoints::COMPLAINT_CATEGORIES, 500, r#"{"error":"db down"}"#);

    let err = api.list_categories().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(err.to_string().contains("db down"));
}

#[tokio::test]
async fn test_edit_of_severity3_complaint_restores_capa() {
    let (transport, api) = setup();
    let path = endpoints::item(endpoints::COMPLAINTS, 31);
    // 历史数据: 严重度 3 但未要求 CAPA
    transport.respond(Method::Get, &path, complaint_json(31, day(12), 3, false));
    transport.respond(Method::Put, &path, complaint_json(31, day(12), 3, true));

    let stored = api.get_complaint(31).await.unwrap();
    assert!(!stored.satisfies_capa_invariant());

    let mut draft = ComplaintDraft::from_complaint(&stored);
    assert!(draft.capa_required);
    draft.notes = Some("re-inspected".to_string());

    let updated = api
        .update_complaint(&session_for("OPERATOR"), 31, &draft, &[])
        .await
        .unwrap();
    assert!(updated.capa_required);

    let sent = transport.requests_to(Method::Put, &path);
    assert_eq!(sent.len(), 1);
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["severityLevel"], json!(3));
    assert_eq!(body["capaRequired"], json!(true));
    assert_eq!(body["notes"], json!("re-inspected"));
}

#[tokio::test]
async fn test_viewer_cannot_edit() {
    let (transport, api) = setup();
    let mut draft = ComplaintDraft::new(day(2));
    draft.category_id = Some(1);

    let err = api
        .update_complaint(&session_for("VIEWER"), 5, &draft, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(transport.write_count(), 0);
}
