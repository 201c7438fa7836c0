mod project;
mod workflow;

pub use project::ProjectCommands;
pub use workflow::{DecisionArg, WorkflowCommands};
