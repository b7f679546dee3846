use std::fs;
use std::path::{Path, PathBuf};

use paydrip_client::commands::plan::{self, CreatePlanOptions, ShowPlanOptions};
use paydrip_client::engine::hooks::PlanHooks;
use paydrip_client::engine::plan::PayoutPlan;
use serde_json::Value;
use tempfile::{Builder, TempDir};

pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("planbook-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

/// Baseline create options: 1200 USD, 12 monthly installments, anchored
/// on a fixed date so tests never read the wall clock.
pub fn monthly_create_options(home: &Path) -> CreatePlanOptions<'_> {
    CreatePlanOptions {
        total: "1200".to_string(),
        currency: None,
        frequency: "monthly".to_string(),
        day_of_week: None,
        dates: Vec::new(),
        installments: Some(12),
        payout_amount: None,
        start: Some("2026-02-01".to_string()),
        emergency_withdrawal: false,
        activate: false,
        as_of: Some("2026-01-15".to_string()),
        home_override: Some(home),
    }
}

/// Create a plan and return the envelope payload as JSON.
pub fn create_plan_payload(options: CreatePlanOptions<'_>) -> Value {
    let result = plan::create(options);
    assert!(result.is_ok(), "plan create failed: {result:?}");
    if let Ok(envelope) = result {
        let payload = serde_json::to_value(envelope);
        assert!(payload.is_ok());
        if let Ok(value) = payload {
            return value;
        }
    }
    Value::Null
}

/// Create a plan and return its generated plan id.
pub fn create_plan_id(options: CreatePlanOptions<'_>) -> String {
    create_plan_payload(options)["data"]["plan"]["plan_id"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

pub fn show_payload(home: &Path, plan_id: &str, as_of: &str) -> Value {
    let result = plan::show(ShowPlanOptions {
        plan_id: plan_id.to_string(),
        as_of: Some(as_of.to_string()),
        home_override: Some(home),
    });
    assert!(result.is_ok(), "plan show failed: {result:?}");
    if let Ok(envelope) = result {
        let payload = serde_json::to_value(envelope);
        assert!(payload.is_ok());
        if let Ok(value) = payload {
            return value;
        }
    }
    Value::Null
}

/// Records hook invocations for assertions.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub completed: Vec<String>,
    pub expiring: Vec<String>,
}

impl PlanHooks for RecordingHooks {
    fn on_installment_completed(&mut self, plan: &PayoutPlan) {
        self.completed.push(plan.plan_id.clone());
    }

    fn on_plan_expiring_soon(&mut self, plan: &PayoutPlan) {
        self.expiring.push(plan.plan_id.clone());
    }
}
