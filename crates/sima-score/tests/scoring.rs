//! End-to-end scoring of full snapshots through the built-in models.

use pretty_assertions::assert_eq;
use sima_core::entities::*;
use sima_core::enums::{Dimension, ScoreStatus};
use sima_core::errors::CoreError;
use sima_score::{CriteriaScorer, Weights, aggregate};

fn complete_snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        meta: SnapshotMeta {
            title: Some("Al-Balad mixed use".into()),
            region: Some("hejaz".into()),
            city: Some("jeddah".into()),
            function: Some("mixed_use".into()),
        },
        files: vec!["site.dwg".into()],
        geometry: Some(GeometryInput {
            heritage_ratio: 1.0,
            palette_compliance: 0.75,
            local_material_ratio: 0.5,
            window_to_wall_ratio: 0.25,
            target_wwr: 0.25,
        }),
        climate: Some(ClimateInput {
            city: "abha".into(),
            floor_area_m2: 1000.0,
            window_to_wall_ratio: 0.25,
            u_wall: 0.5,
            u_glass: 2.0,
            hvac_cop: 3.0,
        }),
        context: Some(ContextInput {
            setback_compliance: 1.0,
            height_m: 10.0,
            neighbourhood_height_m: 10.0,
            active_frontage_ratio: 0.5,
        }),
        program: Some(ProgramInput {
            spaces: vec![ProgramSpace {
                name: "majlis".into(),
                required_m2: 40.0,
                provided_m2: 40.0,
            }],
            gross_area_m2: 400.0,
            net_area_m2: 320.0,
        }),
        survey: Some(SurveyInput {
            responses: vec![4, 5, 3],
        }),
    }
}

#[test]
fn complete_snapshot_scores_every_dimension() {
    let outcome = CriteriaScorer::standard().evaluate(&complete_snapshot());
    assert!(outcome.is_complete(), "{:?}", outcome.failed);

    let scores = outcome.into_sub_scores("prj-1").unwrap();
    assert!((scores.identity - 75.0).abs() < 1e-9);
    assert!((scores.climate - 86.8).abs() < 1e-9);
    assert!((scores.context - 87.5).abs() < 1e-9);
    assert!((scores.function - 100.0).abs() < 1e-9);
    assert!((scores.human - 75.0).abs() < 1e-9);

    // 18.75 + 17.36 + 13.125 + 20 + 15 = 84.235
    let agg = aggregate(&scores, &Weights::default());
    assert_eq!(agg.total, 84.2);
    assert_eq!(agg.status, ScoreStatus::Pass);
}

#[test]
fn scoring_is_deterministic() {
    let scorer = CriteriaScorer::standard();
    let snapshot = complete_snapshot();
    let first = scorer.evaluate(&snapshot);
    for _ in 0..10 {
        assert_eq!(scorer.evaluate(&snapshot), first);
    }
}

#[test]
fn missing_block_fails_only_its_dimension() {
    let mut snapshot = complete_snapshot();
    snapshot.survey = None;
    snapshot.context.as_mut().unwrap().active_frontage_ratio = 2.0;

    let full = CriteriaScorer::standard().evaluate(&complete_snapshot());
    let outcome = CriteriaScorer::standard().evaluate(&snapshot);

    let failed: Vec<Dimension> = outcome.failed.iter().map(|f| f.dimension).collect();
    assert_eq!(failed, vec![Dimension::Context, Dimension::Human]);
    for d in [Dimension::Identity, Dimension::Climate, Dimension::Function] {
        assert_eq!(outcome.scores[&d], full.scores[&d]);
    }

    match outcome.into_sub_scores("prj-1") {
        Err(CoreError::PartialScore { project_id, failed }) => {
            assert_eq!(project_id, "prj-1");
            assert_eq!(failed.len(), 2);
        }
        other => panic!("expected PartialScore, got {other:?}"),
    }
}

#[test]
fn empty_snapshot_fails_all_dimensions() {
    let outcome = CriteriaScorer::standard().evaluate(&ProjectSnapshot::default());
    assert!(outcome.scores.is_empty());
    assert_eq!(outcome.failed.len(), 5);
}
