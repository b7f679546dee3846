use std::path::{Path, PathBuf};

use crate::commands::common::{EXPIRING_WINDOW_DAYS, load_setup, resolve_as_of};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ExpiringData, ExpiringRow};
use crate::engine::allocate::money_string;
use crate::engine::dates::format_iso_date;
use crate::engine::hooks::{NullHooks, PlanHooks};
use crate::engine::plan::PlanStatus;
use crate::engine::progress::{days_until_next, is_expiring_soon};
use crate::state::open_connection;
use crate::store::load_plans;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ExpiringOptions<'a> {
    pub within_days: Option<i64>,
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

/// Reminder-trigger surface: active plans with exactly one remaining
/// installment due within the window.
pub fn run(options: ExpiringOptions<'_>) -> ClientResult<SuccessEnvelope> {
    run_with_hooks(options, &mut NullHooks)
}

pub fn run_with_hooks(
    options: ExpiringOptions<'_>,
    hooks: &mut dyn PlanHooks,
) -> ClientResult<SuccessEnvelope> {
    let command = "expiring";
    let within_days = options.within_days.unwrap_or(EXPIRING_WINDOW_DAYS);
    if within_days < 0 {
        return Err(ClientError::invalid_argument_for_command(
            "`within` must be zero or a positive number of days.",
            Some(command),
        ));
    }

    let setup = load_setup(options.home_override)?;
    let today = resolve_as_of(options.as_of.as_deref(), command)?;

    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let plans = load_plans(&connection, &db_path, Some(PlanStatus::Active))?;

    let mut rows: Vec<ExpiringRow> = Vec::new();
    for plan in &plans {
        if !is_expiring_soon(plan, today, within_days) {
            continue;
        }
        let Some(due_on) = plan.next_pending_date() else {
            continue;
        };
        hooks.on_plan_expiring_soon(plan);
        rows.push(ExpiringRow {
            plan_id: plan.plan_id.clone(),
            due_on: format_iso_date(&due_on),
            amount: money_string(plan.installment_amount(plan.completed_installments)),
            currency: plan.currency.clone(),
            days_until_due: days_until_next(plan, today).unwrap_or(0),
        });
    }

    rows.sort_by(|left, right| {
        left.due_on
            .cmp(&right.due_on)
            .then_with(|| left.plan_id.cmp(&right.plan_id))
    });

    let data = ExpiringData {
        as_of: format_iso_date(&today),
        within_days,
        rows,
    };

    success(command, data)
}
