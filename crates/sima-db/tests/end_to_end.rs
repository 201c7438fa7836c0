//! Upload, review and certification of a single project through the store.

mod common;

use pretty_assertions::assert_eq;
use sima_core::enums::{Decision, EventKind, ScoreStatus, Stage};
use sima_core::errors::CoreError;
use sima_core::requests::AdvanceRequest;

use common::{reference_service, snapshot};

fn advance(version: i64, decision: Option<Decision>) -> AdvanceRequest {
    AdvanceRequest {
        expected_version: version,
        actor: "authority@sima.local".into(),
        comment: "checked against the design code".into(),
        decision,
    }
}

#[tokio::test]
async fn reference_project_is_certified() {
    let svc = reference_service().await;

    let outcome = svc
        .upload("diriyah-01", &snapshot("Diriyah courtyard"), "consultant")
        .await
        .unwrap();
    let report = outcome.report.unwrap();
    // 22.5 + 17.0 + 10.5 + 17.6 + 15.0
    assert_eq!(report.total, 82.6);
    assert_eq!(report.status, ScoreStatus::Pass);

    let score = svc.latest_score("diriyah-01").await.unwrap();
    assert_eq!(score, report);

    let r1 = svc.advance("diriyah-01", &advance(0, None)).await.unwrap();
    let r2 = svc.advance("diriyah-01", &advance(1, None)).await.unwrap();
    assert_ne!(r1.stage, Stage::Approved);
    assert_ne!(r2.stage, Stage::Approved);
    let r3 = svc
        .advance("diriyah-01", &advance(2, Some(Decision::Approve)))
        .await
        .unwrap();
    assert_eq!(r3.stage, Stage::Approved);
    assert_eq!(r3.version, 3);

    let cert = svc
        .issue_certificate("diriyah-01", "authority@sima.local")
        .await
        .unwrap();
    let again = svc
        .issue_certificate("diriyah-01", "authority@sima.local")
        .await
        .unwrap();
    assert_eq!(cert.id, again.id);
    assert_eq!(cert.report.total, 82.6);

    let kinds: Vec<EventKind> = svc
        .read_timeline("diriyah-01")
        .await
        .unwrap()
        .iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Upload,
            EventKind::Analysis,
            EventKind::Advance,
            EventKind::Advance,
            EventKind::Advance,
            EventKind::CertificateIssued,
        ]
    );
}

#[tokio::test]
async fn approved_project_accepts_no_further_moves() {
    let svc = reference_service().await;
    svc.upload("villa-a", &snapshot("Villa"), "consultant")
        .await
        .unwrap();
    svc.advance("villa-a", &advance(0, Some(Decision::Reject)))
        .await
        .unwrap();

    for decision in [None, Some(Decision::Approve), Some(Decision::Reject)] {
        let err = svc.advance("villa-a", &advance(1, decision)).await.unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(CoreError::InvalidTransition { .. })
        ));
    }
    let err = svc
        .issue_certificate("villa-a", "authority")
        .await
        .unwrap_err();
    assert!(matches!(err.domain(), Some(CoreError::NotApproved { .. })));
}

#[tokio::test]
async fn version_increases_by_one_per_advance() {
    let svc = reference_service().await;
    svc.upload("villa-b", &snapshot("Villa"), "consultant")
        .await
        .unwrap();
    let mut last = svc.get_project("villa-b").await.unwrap().version;
    for decision in [None, None, Some(Decision::Approve)] {
        let moved = svc
            .advance("villa-b", &advance(last, decision))
            .await
            .unwrap();
        assert_eq!(moved.version, last + 1);
        last = moved.version;
    }
    let state = svc.workflow_state("villa-b").await.unwrap();
    assert_eq!(state.history.last().unwrap().to_stage, state.stage);
}

#[tokio::test]
async fn conditional_score_needs_a_first_decision() {
    let svc = common::fixed_service([60.0; 5]).await;
    let outcome = svc
        .upload("villa-c", &snapshot("Villa"), "consultant")
        .await
        .unwrap();
    assert_eq!(outcome.report.unwrap().status, ScoreStatus::Conditional);

    let err = svc.advance("villa-c", &advance(0, None)).await.unwrap_err();
    assert!(matches!(err.domain(), Some(CoreError::Validation(_))));

    svc.advance("villa-c", &advance(0, Some(Decision::Approve)))
        .await
        .unwrap();
    // Once a reviewer has decided, later review stages advance normally.
    svc.advance("villa-c", &advance(1, None)).await.unwrap();
}

#[tokio::test]
async fn failing_score_needs_a_decision_on_every_advance() {
    let svc = common::fixed_service([30.0; 5]).await;
    svc.upload("villa-d", &snapshot("Villa"), "consultant")
        .await
        .unwrap();

    svc.advance("villa-d", &advance(0, Some(Decision::Approve)))
        .await
        .unwrap();
    let err = svc.advance("villa-d", &advance(1, None)).await.unwrap_err();
    assert!(matches!(err.domain(), Some(CoreError::Validation(_))));
}
