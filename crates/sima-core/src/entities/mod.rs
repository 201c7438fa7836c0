//! Entity structs for all SIMA domain objects.
//!
//! Each entity maps to a table in the libSQL store (see `sima-db` migrations).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod certificate;
mod project;
mod score;
mod snapshot;
mod timeline;
mod workflow;

pub use certificate::Certificate;
pub use project::{NewProject, Project};
pub use score::{ScoreReport, SubScores};
pub use snapshot::{
    ClimateInput, ContextInput, GeometryInput, ProgramInput, ProgramSpace, ProjectSnapshot,
    SnapshotMeta, SurveyInput,
};
pub use timeline::TimelineEvent;
pub use workflow::{HistoryEntry, WorkflowState};
