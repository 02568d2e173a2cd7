// ==========================================
// ATP 拭子判定测试
// ==========================================

mod helpers;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use quicklog_quality::domain::{AtpSample, AtpThresholdConfig, RluThreshold, SampleTiming, SwabStatus, Zone};
use quicklog_quality::engine::{EngineError, SwabClassifier};

fn config() -> AtpThresholdConfig {
    let mut zones = BTreeMap::new();
    zones.insert(Zone::Z1, RluThreshold { pass_max_rlu: 100.0 });
    zones.insert(Zone::Z2, RluThreshold { pass_max_rlu: 200.0 });
    AtpThresholdConfig {
        zones,
        default: RluThreshold { pass_max_rlu: 300.0 },
        retest_sla_hours: 4.5,
    }
}

fn sample(id: i64, location_id: i64, rlu: f64) -> AtpSample {
    AtpSample {
        id,
        sample_date: NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap(),
        location_id,
        rlu,
        timing: SampleTiming::PreOp,
        status: None,
        notes: None,
    }
}

#[test]
fn test_threshold_is_inclusive_pass() {
    let c = config();
    let at = SwabClassifier::classify(100.0, Zone::Z1, &c).unwrap();
    assert_eq!(at.status, SwabStatus::Pass);
    assert_eq!(at.threshold_used, 100.0);

    let over = SwabClassifier::classify(100.5, Zone::Z1, &c).unwrap();
    assert_eq!(over.status, SwabStatus::Fail);
}

#[test]
fn test_zone_without_override_uses_default() {
    let c = config();
    let r = SwabClassifier::classify(250.0, Zone::Z3, &c).unwrap();
    assert_eq!(r.status, SwabStatus::Pass);
    assert_eq!(r.threshold_used, 300.0);

    let r = SwabClassifier::classify(250.0, Zone::Z2, &c).unwrap();
    assert_eq!(r.status, SwabStatus::Fail);
}

#[test]
fn test_invalid_rlu_rejected() {
    let c = config();
    assert!(matches!(
        SwabClassifier::classify(-1.0, Zone::Z1, &c),
        Err(EngineError::InvalidRlu(_))
    ));
    assert!(SwabClassifier::classify(f64::NAN, Zone::Z1, &c).is_err());
    assert!(SwabClassifier::classify(0.0, Zone::Z1, &c).is_ok());
}

#[test]
fn test_retest_due_only_for_failures() {
    let c = config();
    let s = sample(1, 1, 500.0);
    let due = SwabClassifier::retest_due_at(s.sample_date, SwabStatus::Fail, &c).unwrap();
    assert_eq!(
        due,
        NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    );
    assert_eq!(
        SwabClassifier::retest_due_at(s.sample_date, SwabStatus::Pass, &c),
        None
    );
}

#[test]
fn test_summary_reclassifies_with_current_config() {
    let c = config();
    let mut stale = sample(3, 10, 150.0);
    stale.status = Some(SwabStatus::Pass);
    let samples = vec![sample(1, 10, 50.0), sample(2, 10, 120.0), stale, sample(4, 20, 210.0), sample(5, 99, 1.0)];

    let zones: HashMap<i64, Zone> = [(10, Zone::Z1), (20, Zone::Z2)].into_iter().collect();
    let summary = SwabClassifier::summarize_by_zone(&samples, &zones, &c);

    let z1 = summary[&Zone::Z1];
    assert_eq!((z1.total, z1.failed), (3, 2));
    let z2 = summary[&Zone::Z2];
    assert_eq!((z2.total, z2.failed), (1, 1));
    assert!(!summary.contains_key(&Zone::Z3));
    assert_eq!(z2.pass_rate(), Some(0.0));
}
