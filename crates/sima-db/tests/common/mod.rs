//! Shared fixtures for sima-db integration tests.

#![allow(dead_code)]

use sima_config::SimaConfig;
use sima_core::entities::{ProjectSnapshot, SnapshotMeta};
use sima_core::enums::Dimension;
use sima_db::SimaDb;
use sima_db::service::SimaService;
use sima_score::{CriteriaScorer, CriterionScorer, DimensionFault};

/// Scores one dimension with a constant.
pub struct Fixed(pub Dimension, pub f64);

impl CriterionScorer for Fixed {
    fn dimension(&self) -> Dimension {
        self.0
    }

    fn score(&self, _snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        Ok(self.1)
    }
}

/// In-memory service whose scorer always returns `scores`, given in
/// canonical dimension order.
pub async fn fixed_service(scores: [f64; 5]) -> SimaService {
    fixed_service_with(scores, &SimaConfig::default()).await
}

/// Like [`fixed_service`] with an explicit configuration.
pub async fn fixed_service_with(scores: [f64; 5], config: &SimaConfig) -> SimaService {
    let scorer = Dimension::ALL
        .into_iter()
        .zip(scores)
        .fold(CriteriaScorer::empty(), |acc, (d, v)| {
            acc.with_scorer(Box::new(Fixed(d, v)))
        });
    let db = SimaDb::open_local(":memory:").await.unwrap();
    SimaService::from_db(db, config)
        .unwrap()
        .with_scorer(scorer)
}

/// `{identity:90, climate:85, context:70, function:88, human:75}`.
pub async fn reference_service() -> SimaService {
    fixed_service([90.0, 85.0, 70.0, 88.0, 75.0]).await
}

pub fn snapshot(title: &str) -> ProjectSnapshot {
    ProjectSnapshot {
        meta: SnapshotMeta {
            title: Some(title.into()),
            region: Some("najd".into()),
            city: Some("riyadh".into()),
            function: Some("residential".into()),
        },
        files: vec!["model.ifc".into()],
        ..ProjectSnapshot::default()
    }
}
