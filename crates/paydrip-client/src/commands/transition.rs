use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::commands::common::{load_setup, resolve_as_of};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::TransitionData;
use crate::engine::ScheduleError;
use crate::engine::dates::format_iso_date;
use crate::engine::plan::{PayoutPlan, PlanStatus};
use crate::state::open_connection;
use crate::store::with_plan_mut;

#[derive(Debug, Default)]
pub struct TransitionOptions<'a> {
    pub plan_id: String,
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn activate(options: TransitionOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_transition(options, "plan activate", PayoutPlan::activate)
}

pub fn pause(options: TransitionOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_transition(options, "plan pause", PayoutPlan::pause)
}

pub fn resume(options: TransitionOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_transition(options, "plan resume", PayoutPlan::resume)
}

pub fn cancel(options: TransitionOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_transition(options, "plan cancel", PayoutPlan::cancel)
}

fn run_transition(
    options: TransitionOptions<'_>,
    command: &'static str,
    action: fn(&mut PayoutPlan) -> Result<(), ScheduleError>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let today = resolve_as_of(options.as_of.as_deref(), command)?;

    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let mut previous_status: Option<PlanStatus> = None;
    let plan = with_plan_mut(&mut connection, &db_path, &options.plan_id, |plan| {
        previous_status = Some(plan.status);
        action(plan)
    })?;

    // Resuming never shifts the schedule; surface the soonest remaining
    // date that is still payable for display.
    let next_payable_on = if plan.status == PlanStatus::Active {
        plan.next_payable_on_or_after(today)
            .map(|date| format_iso_date(&date))
    } else {
        None
    };

    let data = TransitionData {
        plan_id: plan.plan_id.clone(),
        previous_status: previous_status
            .unwrap_or(plan.status)
            .as_str()
            .to_string(),
        status: plan.status.as_str().to_string(),
        message: transition_message(command, &plan),
        next_payable_on,
    };

    success(command, data)
}

fn transition_message(command: &str, plan: &PayoutPlan) -> String {
    match command {
        "plan activate" => "Plan activated. Disbursements can now be recorded.".to_string(),
        "plan pause" => "Plan paused. The schedule is unchanged.".to_string(),
        "plan resume" => "Plan resumed. Remaining installments stay on their original dates."
            .to_string(),
        "plan cancel" => format!(
            "Plan cancelled after {} of {} installments.",
            plan.completed_installments, plan.installment_count
        ),
        _ => format!("Plan is now {}.", plan.status),
    }
}
