//! Pure workflow transition function.
//!
//! `StagePlan` holds the configured review stages; [`StagePlan::apply`] maps
//! `(current stage, transition, score gate)` to the next stage without
//! touching storage. The store commits the result with a compare-and-swap on
//! the project version.

use crate::enums::{Decision, ScoreStatus, Stage};
use crate::errors::CoreError;

/// A requested stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advance { decision: Option<Decision> },
    Reopen,
}

/// Whether the current score lets a review stage advance without an
/// explicit reviewer decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGate {
    Clear,
    DecisionRequired,
}

impl ScoreGate {
    /// Derive the gate from the current report status.
    ///
    /// FAIL (or no report at all) needs an explicit decision on every
    /// advance. CONDITIONAL needs one until the first review decision is on
    /// record.
    #[must_use]
    pub const fn for_status(status: Option<ScoreStatus>, decision_recorded: bool) -> Self {
        match status {
            Some(ScoreStatus::Pass) => Self::Clear,
            Some(ScoreStatus::Conditional) if decision_recorded => Self::Clear,
            Some(ScoreStatus::Conditional | ScoreStatus::Fail) | None => Self::DecisionRequired,
        }
    }
}

/// Ordered review stages; the last one forks to `approved` / `rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<String>,
}

impl StagePlan {
    /// Build a plan from configured stage names.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the list is empty, contains blank or
    /// duplicate names, or reuses a terminal name.
    pub fn new<I, S>(stages: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stages: Vec<String> = stages.into_iter().map(Into::into).collect();
        if stages.is_empty() {
            return Err(CoreError::Validation(
                "workflow needs at least one review stage".into(),
            ));
        }
        for (idx, name) in stages.iter().enumerate() {
            if name.trim().is_empty() || name.trim() != name {
                return Err(CoreError::Validation(format!(
                    "invalid stage name '{name}'"
                )));
            }
            if name == Stage::APPROVED || name == Stage::REJECTED {
                return Err(CoreError::Validation(format!(
                    "'{name}' is reserved for terminal outcomes"
                )));
            }
            if stages[..idx].contains(name) {
                return Err(CoreError::Validation(format!(
                    "duplicate stage name '{name}'"
                )));
            }
        }
        Ok(Self { stages })
    }

    /// `submitted → technical_review → authority_review`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            stages: vec![
                "submitted".into(),
                "technical_review".into(),
                "authority_review".into(),
            ],
        }
    }

    #[must_use]
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Stage a project enters on creation.
    #[must_use]
    pub fn initial(&self) -> Stage {
        Stage::Review(self.stages[0].clone())
    }

    /// Whether `stage` is the review stage adjacent to the terminal fork.
    #[must_use]
    pub fn is_fork(&self, stage: &Stage) -> bool {
        match stage {
            Stage::Review(name) => self.stages.last() == Some(name),
            Stage::Approved | Stage::Rejected => false,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s == name)
    }

    /// Apply `transition` to `current`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when `current` is terminal, unknown to this plan,
    ///   or a reopen targets the initial stage.
    /// - `Validation` when a decision is required but missing.
    pub fn apply(
        &self,
        project_id: &str,
        current: &Stage,
        transition: Transition,
        gate: ScoreGate,
    ) -> Result<Stage, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidTransition {
            project_id: project_id.to_string(),
            from: current.to_string(),
            reason: reason.to_string(),
        };

        let name = match current {
            Stage::Approved | Stage::Rejected => {
                return Err(invalid("terminal stage is absorbing"));
            }
            Stage::Review(name) => name,
        };
        let idx = self
            .position(name)
            .ok_or_else(|| invalid("stage is not part of the configured workflow"))?;

        match transition {
            Transition::Reopen => {
                if idx == 0 {
                    return Err(invalid("already at the initial stage"));
                }
                Ok(self.initial())
            }
            Transition::Advance {
                decision: Some(Decision::Reject),
            } => Ok(Stage::Rejected),
            Transition::Advance { decision } if idx + 1 == self.stages.len() => match decision {
                Some(Decision::Approve) => Ok(Stage::Approved),
                _ => Err(CoreError::Validation(format!(
                    "stage '{name}' requires a decision (approve or reject)"
                ))),
            },
            Transition::Advance { decision } => {
                if gate == ScoreGate::DecisionRequired && decision.is_none() {
                    return Err(CoreError::Validation(format!(
                        "score gate requires an explicit reviewer decision to leave '{name}'"
                    )));
                }
                Ok(Stage::Review(self.stages[idx + 1].clone()))
            }
        }
    }
}

impl Default for StagePlan {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn review(name: &str) -> Stage {
        Stage::Review(name.into())
    }

    fn advance(decision: Option<Decision>) -> Transition {
        Transition::Advance { decision }
    }

    #[test]
    fn three_advances_reach_approved() {
        let plan = StagePlan::standard();
        let mut stage = plan.initial();
        stage = plan.apply("p", &stage, advance(None), ScoreGate::Clear).unwrap();
        assert_eq!(stage, review("technical_review"));
        stage = plan.apply("p", &stage, advance(None), ScoreGate::Clear).unwrap();
        assert_eq!(stage, review("authority_review"));
        stage = plan
            .apply("p", &stage, advance(Some(Decision::Approve)), ScoreGate::Clear)
            .unwrap();
        assert_eq!(stage, Stage::Approved);
    }

    #[test]
    fn fork_requires_decision() {
        let plan = StagePlan::standard();
        let err = plan
            .apply("p", &review("authority_review"), advance(None), ScoreGate::Clear)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn reject_is_available_from_any_review_stage() {
        let plan = StagePlan::standard();
        for name in plan.stages().to_vec() {
            let next = plan
                .apply("p", &review(&name), advance(Some(Decision::Reject)), ScoreGate::Clear)
                .unwrap();
            assert_eq!(next, Stage::Rejected);
        }
    }

    #[test]
    fn terminal_stages_are_absorbing() {
        let plan = StagePlan::standard();
        for terminal in [Stage::Approved, Stage::Rejected] {
            for transition in [
                advance(None),
                advance(Some(Decision::Approve)),
                Transition::Reopen,
            ] {
                let err = plan
                    .apply("p", &terminal, transition, ScoreGate::Clear)
                    .unwrap_err();
                assert!(matches!(err, CoreError::InvalidTransition { .. }));
            }
        }
    }

    #[test]
    fn decision_gate_blocks_plain_advance() {
        let plan = StagePlan::standard();
        let err = plan
            .apply("p", &review("submitted"), advance(None), ScoreGate::DecisionRequired)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let next = plan
            .apply(
                "p",
                &review("submitted"),
                advance(Some(Decision::Approve)),
                ScoreGate::DecisionRequired,
            )
            .unwrap();
        assert_eq!(next, review("technical_review"));
    }

    #[test]
    fn reopen_returns_to_initial_stage() {
        let plan = StagePlan::standard();
        let next = plan
            .apply("p", &review("authority_review"), Transition::Reopen, ScoreGate::Clear)
            .unwrap();
        assert_eq!(next, plan.initial());

        let err = plan
            .apply("p", &plan.initial(), Transition::Reopen, ScoreGate::Clear)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let plan = StagePlan::standard();
        let err = plan
            .apply("p", &review("legacy"), advance(None), ScoreGate::Clear)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn single_stage_plan_forks_immediately() {
        let plan = StagePlan::new(["review"]).unwrap();
        assert!(plan.is_fork(&plan.initial()));
        let next = plan
            .apply("p", &plan.initial(), advance(Some(Decision::Approve)), ScoreGate::Clear)
            .unwrap();
        assert_eq!(next, Stage::Approved);
    }

    #[test]
    fn plan_validation() {
        assert!(StagePlan::new(Vec::<String>::new()).is_err());
        assert!(StagePlan::new(["a", "a"]).is_err());
        assert!(StagePlan::new(["a", "approved"]).is_err());
        assert!(StagePlan::new(["a", " b"]).is_err());
        assert!(StagePlan::new(["intake", "committee"]).is_ok());
    }

    #[test]
    fn gate_follows_score_status() {
        assert_eq!(
            ScoreGate::for_status(Some(ScoreStatus::Pass), false),
            ScoreGate::Clear
        );
        assert_eq!(
            ScoreGate::for_status(Some(ScoreStatus::Conditional), false),
            ScoreGate::DecisionRequired
        );
        assert_eq!(
            ScoreGate::for_status(Some(ScoreStatus::Conditional), true),
            ScoreGate::Clear
        );
        assert_eq!(
            ScoreGate::for_status(Some(ScoreStatus::Fail), true),
            ScoreGate::DecisionRequired
        );
        assert_eq!(ScoreGate::for_status(None, false), ScoreGate::DecisionRequired);
    }
}
