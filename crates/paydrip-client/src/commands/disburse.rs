use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::commands::common::{EXPIRING_WINDOW_DAYS, load_setup, resolve_as_of};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::DisburseData;
use crate::engine::allocate::money_string;
use crate::engine::dates::format_iso_date;
use crate::engine::hooks::{NullHooks, PlanHooks};
use crate::engine::plan::PlanStatus;
use crate::engine::progress::is_expiring_soon;
use crate::state::open_connection;
use crate::store::with_plan_mut;

#[derive(Debug, Default)]
pub struct DisburseOptions<'a> {
    pub plan_id: String,
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

/// Record one successful disbursement against an active plan.
pub fn run(options: DisburseOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_with_hooks(options, &mut NullHooks)
}

pub fn run_with_hooks(
    options: DisburseOptions<'_>,
    hooks: &mut dyn PlanHooks,
) -> ClientResult<SuccessEnvelope> {
    let command = "plan disburse";
    let setup = load_setup(options.home_override)?;
    let today = resolve_as_of(options.as_of.as_deref(), command)?;

    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let mut consumed_index = 0usize;
    let plan = with_plan_mut(&mut connection, &db_path, &options.plan_id, |plan| {
        consumed_index = plan.completed_installments;
        plan.record_disbursement()
    })?;

    hooks.on_installment_completed(&plan);
    if is_expiring_soon(&plan, today, EXPIRING_WINDOW_DAYS) {
        hooks.on_plan_expiring_soon(&plan);
    }

    let due_on = plan
        .schedule
        .get(consumed_index)
        .map(format_iso_date)
        .unwrap_or_default();

    let data = DisburseData {
        plan_id: plan.plan_id.clone(),
        seq: consumed_index + 1,
        due_on,
        amount: money_string(plan.installment_amount(consumed_index)),
        currency: plan.currency.clone(),
        completed_installments: plan.completed_installments,
        installment_count: plan.installment_count,
        status: plan.status.as_str().to_string(),
        next_due_on: plan.next_pending_date().map(|date| format_iso_date(&date)),
        plan_completed: plan.status == PlanStatus::Completed,
    };

    success(command, data)
}
