use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::engine::ScheduleError;

/// Contract-level failure: a stable code, a human-readable message, and
/// concrete recovery steps. The CLI renders these; the engine and store
/// only construct them.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `paydrip {cmd} --help` for usage."),
            None => "Run `paydrip --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn plan_not_found(plan_id: &str) -> Self {
        Self::new(
            "plan_not_found",
            &format!("Plan `{plan_id}` was not found."),
            vec![
                "Run `paydrip plan list` to find a valid plan id.".to_string(),
                "Retry with the plan id exactly as listed (plan_...).".to_string(),
            ],
        )
        .with_data(json!({
            "plan_id": plan_id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn planbook_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "planbook_init_permission_denied",
            &format!("Cannot initialize the planbook at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `PAYDRIP_HOME` to a writable directory."
            )],
        )
    }

    pub fn planbook_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "planbook_locked",
            &format!("Planbook database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn planbook_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "planbook_corrupt",
            &format!("Planbook database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite planbook file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Planbook migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn planbook_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "planbook_init_failed",
            &format!("Planbook initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

impl From<ScheduleError> for ClientError {
    fn from(error: ScheduleError) -> Self {
        let code = match &error {
            ScheduleError::InvalidFrequencyConfig { .. } => "invalid_frequency_config",
            ScheduleError::InvalidDuration => "invalid_duration",
            ScheduleError::InvalidAllocation { .. } => "invalid_allocation",
            ScheduleError::InvalidTransition { .. } => "invalid_transition",
            ScheduleError::PlanNotActive { .. } => "plan_not_active",
        };
        let recovery_steps = match &error {
            ScheduleError::InvalidFrequencyConfig { .. } => vec![
                "Run `paydrip options --frequency <frequency>` to review valid configurations."
                    .to_string(),
            ],
            ScheduleError::InvalidDuration => vec![
                "Choose an installment count of at least 1.".to_string(),
                "Run `paydrip options --frequency <frequency>` for duration presets.".to_string(),
            ],
            ScheduleError::InvalidAllocation { .. } => vec![
                "Provide a positive total and either an installment count or a payout amount."
                    .to_string(),
            ],
            ScheduleError::InvalidTransition { .. } => vec![
                "Run `paydrip plan show <plan-id>` to check the plan status.".to_string(),
            ],
            ScheduleError::PlanNotActive { .. } => vec![
                "Only active plans accept disbursements.".to_string(),
                "Run `paydrip plan resume <plan-id>` if the plan is paused.".to_string(),
            ],
        };
        Self::new(code, &error.to_string(), recovery_steps)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
