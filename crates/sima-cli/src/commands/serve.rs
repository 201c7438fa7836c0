use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;

/// Handle `sima serve`. Runs until the process is stopped.
pub async fn handle(args: &ServeArgs, ctx: AppContext) -> anyhow::Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(bind) = &args.bind {
        server.bind.clone_from(bind);
    }
    sima_server::serve(ctx.service, server).await
}
