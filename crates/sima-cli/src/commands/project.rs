use sima_core::entities::NewProject;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::New {
            title,
            region,
            city,
            function,
        } => {
            let new = NewProject {
                title: title.clone(),
                region: region.clone(),
                city: city.clone(),
                function: function.clone(),
            };
            let project = ctx.service.register_project(new, ctx.actor(flags)).await?;
            output(&project, flags.format)
        }
        ProjectCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let projects = ctx.service.list_projects(limit).await?;
            output(&projects, flags.format)
        }
        ProjectCommands::Show { id } => {
            let project = ctx.service.get_project(id).await?;
            output(&project, flags.format)
        }
    }
}
