//! Per-invocation application context: resolved configuration and an open
//! store.

use anyhow::Context;
use sima_config::SimaConfig;
use sima_db::service::SimaService;

use crate::cli::GlobalFlags;

pub struct AppContext {
    pub config: SimaConfig,
    pub service: SimaService,
}

impl AppContext {
    /// Load configuration (with `.env`), apply flag overrides, validate and
    /// open the store.
    pub async fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut config = SimaConfig::load_with_dotenv().context("failed to load configuration")?;
        if let Some(path) = &flags.config_db {
            config.database.path.clone_from(path);
        }
        config.validate().context("invalid configuration")?;

        let service = SimaService::new_local(&config)
            .await
            .with_context(|| format!("failed to open store at {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "store ready");
        Ok(Self { config, service })
    }

    /// `--actor`, else `[general].actor`.
    pub fn actor<'a>(&'a self, flags: &'a GlobalFlags) -> &'a str {
        flags.actor.as_deref().unwrap_or(&self.config.general.actor)
    }
}
