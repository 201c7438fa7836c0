//! Service layer orchestrating store mutations with the timeline ledger.
//!
//! `SimaService` wraps `SimaDb` (raw database access), the criteria scorer,
//! the configured weights and stage plan, and the `SchemaRegistry`. All repo
//! methods are implemented as `impl SimaService`.

use sima_config::SimaConfig;
use sima_core::errors::CoreError;
use sima_core::workflow::StagePlan;
use sima_schema::SchemaRegistry;
use sima_score::{CriteriaScorer, Weights};

use crate::SimaDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;

/// Orchestrates store mutations with their timeline events.
///
/// Every mutation method follows this protocol:
/// 1. Acquire the connection and begin a transaction
/// 2. Check preconditions against current rows
/// 3. Apply the state change (version CAS for workflow moves)
/// 4. Append the timeline event inside the same transaction
/// 5. Commit, or roll back everything on any failure
pub struct SimaService {
    db: SimaDb,
    scorer: CriteriaScorer,
    weights: Weights,
    plan: StagePlan,
    retry: RetryConfig,
    advance_attempts: u32,
    schema: SchemaRegistry,
}

impl SimaService {
    /// Open the store named by `config.database.path` and build a service.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the configuration is invalid or the
    /// database cannot be opened.
    pub async fn new_local(config: &SimaConfig) -> Result<Self, DatabaseError> {
        let db = SimaDb::open_local(&config.database.path).await?;
        Self::from_db(db, config)
    }

    /// Create from an existing `SimaDb`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Domain(Validation)` for invalid weights or
    /// stage names.
    pub fn from_db(db: SimaDb, config: &SimaConfig) -> Result<Self, DatabaseError> {
        let s = &config.scoring;
        let weights = Weights::new(s.identity, s.climate, s.context, s.function, s.human)?;
        let plan = config.workflow.plan().map_err(CoreError::Validation)?;
        Ok(Self {
            db,
            scorer: CriteriaScorer::standard(),
            weights,
            plan,
            retry: RetryConfig::with_max_attempts(config.workflow.busy_retry_attempts),
            advance_attempts: config.workflow.max_attempts.max(1),
            schema: SchemaRegistry::new(),
        })
    }

    /// Replace the scorer set (e.g. with a custom dimension model).
    #[must_use]
    pub fn with_scorer(mut self, scorer: CriteriaScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SimaDb {
        &self.db
    }

    #[must_use]
    pub const fn scorer(&self) -> &CriteriaScorer {
        &self.scorer
    }

    #[must_use]
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub const fn plan(&self) -> &StagePlan {
        &self.plan
    }

    #[must_use]
    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Attempts made by `advance_latest` before surfacing `StaleVersion`.
    #[must_use]
    pub const fn advance_attempts(&self) -> u32 {
        self.advance_attempts
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
