use sima_core::requests::{AdvanceRequest, ReopenRequest};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::WorkflowCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima workflow`.
pub async fn handle(
    action: &WorkflowCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor(flags);
    match action {
        WorkflowCommands::Status { id } => {
            let state = ctx.service.workflow_state(id).await?;
            output(&state, flags.format)
        }
        WorkflowCommands::Advance {
            id,
            comment,
            decision,
            expected_version,
        } => {
            let decision = decision.map(Into::into);
            let moved = match expected_version {
                Some(expected_version) => {
                    let request = AdvanceRequest {
                        expected_version: *expected_version,
                        actor: actor.to_string(),
                        comment: comment.clone(),
                        decision,
                    };
                    ctx.service.advance(id, &request).await?
                }
                None => {
                    ctx.service
                        .advance_latest(id, actor, comment, decision)
                        .await?
                }
            };
            output(&moved, flags.format)
        }
        WorkflowCommands::Reopen {
            id,
            comment,
            expected_version,
        } => {
            let expected_version = match expected_version {
                Some(version) => *version,
                None => ctx.service.get_project(id).await?.version,
            };
            let request = ReopenRequest {
                expected_version,
                actor: actor.to_string(),
                comment: comment.clone(),
            };
            let moved = ctx.service.reopen(id, &request).await?;
            output(&moved, flags.format)
        }
    }
}
