//! Shared helpers for sima-db unit tests.

use sima_config::SimaConfig;
use sima_core::entities::*;

use crate::SimaDb;
use crate::service::SimaService;

/// In-memory service with default configuration.
pub async fn test_service() -> SimaService {
    let db = SimaDb::open_local(":memory:").await.unwrap();
    SimaService::from_db(db, &SimaConfig::default()).unwrap()
}

/// A snapshot every built-in dimension model can score.
pub fn complete_snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        meta: SnapshotMeta {
            title: Some("Courtyard house".into()),
            region: Some("najd".into()),
            city: Some("riyadh".into()),
            function: Some("residential".into()),
        },
        files: vec!["model.ifc".into()],
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
