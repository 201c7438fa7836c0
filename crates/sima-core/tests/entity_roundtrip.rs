//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::Utc;
use schemars::schema_for;
use sima_core::entities::*;
use sima_core::enums::*;
use sima_core::errors::DimensionFailure;
use sima_core::payloads::*;
use sima_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        meta: SnapshotMeta {
            title: Some("Diriyah courtyard house".into()),
            region: Some("najd".into()),
            city: Some("الرياض".into()),
            function: Some("residential".into()),
        },
        files: vec!["model.ifc".into(), "brief.pdf".into()],
        geometry: Some(GeometryInput {
            heritage_ratio: 0.75,
            palette_compliance: 0.5,
            local_material_ratio: 0.625,
            window_to_wall_ratio: 0.25,
            target_wwr: 0.25,
        }),
        climate: Some(ClimateInput {
            city: "الرياض".into(),
            floor_area_m2: 1000.0,
            window_to_wall_ratio: 0.25,
            u_wall: 0.5,
            u_glass: 2.0,
            hvac_cop: 3.0,
        }),
        context: Some(ContextInput {
            setback_compliance: 1.0,
            height_m: 12.0,
            neighbourhood_height_m: 10.0,
            active_frontage_ratio: 0.5,
        }),
        program: Some(ProgramInput {
            spaces: vec![ProgramSpace {
                name: "majlis".into(),
                required_m2: 40.0,
                provided_m2: 42.0,
            }],
            gross_area_m2: 400.0,
            net_area_m2: 320.0,
        }),
        survey: Some(SurveyInput {
            responses: vec![4, 5, 3],
        }),
    }
}

fn sample_report() -> ScoreReport {
    ScoreReport {
        project_id: "prj-a3f8b2c1".into(),
        score_version: 2,
        snapshot_rev: 3,
        scores: SubScores {
            identity: 90.0,
            climate: 85.0,
            context: 70.0,
            function: 88.0,
            human: 75.0,
        },
        total: 82.5,
        status: ScoreStatus::Pass,
        computed_at: Utc::now(),
    }
}

fn sample_project() -> Project {
    Project {
        id: "prj-a3f8b2c1".into(),
        tracking_no: "SIMA-20260214-a3f8b2c1".into(),
        title: Some("Diriyah courtyard house".into()),
        region: Some("najd".into()),
        city: None,
        function: None,
        stage: Stage::Review("technical_review".into()),
        version: 1,
        snapshot_rev: 3,
        score_version: 2,
        latest_snapshot: Some(sample_snapshot()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(snapshot_roundtrip, ProjectSnapshot, sample_snapshot());

roundtrip_and_validate!(
    empty_snapshot_roundtrip,
    ProjectSnapshot,
    ProjectSnapshot::default()
);

roundtrip_and_validate!(project_roundtrip, Project, sample_project());

roundtrip_and_validate!(score_report_roundtrip, ScoreReport, sample_report());

roundtrip_and_validate!(
    workflow_state_roundtrip,
    WorkflowState,
    WorkflowState {
        project_id: "prj-a3f8b2c1".into(),
        stage: Stage::Approved,
        version: 3,
        history: vec![
            HistoryEntry {
                seq: 1,
                from_stage: None,
                to_stage: Stage::Review("submitted".into()),
                actor: "consultant@sima.local".into(),
                comment: "project created".into(),
                decision: None,
                version: 0,
                at: Utc::now(),
            },
            HistoryEntry {
                seq: 2,
                from_stage: Some(Stage::Review("authority_review".into())),
                to_stage: Stage::Approved,
                actor: "authority@sima.local".into(),
                comment: "meets DASC articles".into(),
                decision: Some(Decision::Approve),
                version: 3,
                at: Utc::now(),
            },
        ],
    }
);

roundtrip_and_validate!(
    timeline_event_roundtrip,
    TimelineEvent,
    TimelineEvent {
        project_id: "prj-a3f8b2c1".into(),
        seq: 4,
        kind: EventKind::Advance,
        payload: serde_json::json!({"from": "submitted", "to": "technical_review"}),
        at: Utc::now(),
    }
);

roundtrip_and_validate!(
    certificate_roundtrip,
    Certificate,
    Certificate {
        id: "crt-0b1c2d3e".into(),
        project_id: "prj-a3f8b2c1".into(),
        score_version: 2,
        report: sample_report(),
        issued_by: "authority@sima.local".into(),
        issued_at: Utc::now(),
        verification_token: "ab".repeat(32),
    }
);

roundtrip_and_validate!(
    analysis_payload_roundtrip,
    AnalysisPayload,
    AnalysisPayload {
        snapshot_rev: 2,
        complete: false,
        score_version: None,
        total: None,
        status: None,
        failed: vec![DimensionFailure {
            dimension: Dimension::Human,
            reason: "survey has no responses".into(),
        }],
    }
);

roundtrip_and_validate!(
    advance_payload_roundtrip,
    AdvancePayload,
    AdvancePayload {
        actor: "authority@sima.local".into(),
        from: Stage::Review("authority_review".into()),
        to: Stage::Rejected,
        decision: Some(Decision::Reject),
        comment: "facade violates palette article".into(),
        version: 3,
    }
);

roundtrip_and_validate!(
    upload_outcome_roundtrip,
    UploadOutcome,
    UploadOutcome {
        project: sample_project(),
        report: Some(sample_report()),
        failed: vec![],
        superseded: false,
    }
);

#[test]
fn score_response_has_spec_shape() {
    let response = ScoreResponse::from(&sample_report());
    let json = serde_json::to_value(&response).unwrap();
    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "climate", "context", "function", "human", "identity", "status", "total"
        ]
    );
    assert_eq!(json["status"], "PASS");
}

#[test]
fn score_report_flattens_sub_scores() {
    let json = serde_json::to_value(sample_report()).unwrap();
    assert_eq!(json["identity"], 90.0);
    assert!(json.get("scores").is_none());
}
