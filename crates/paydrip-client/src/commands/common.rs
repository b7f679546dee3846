use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::contracts::types::{PlanRow, ProgressSummary, ScheduleEntry};
use crate::engine::allocate::money_string;
use crate::engine::dates::{format_iso_date, parse_iso_date};
use crate::engine::frequency::Frequency;
use crate::engine::plan::{PayoutPlan, PlanStatus};
use crate::engine::progress;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};
use crate::{ClientError, ClientResult};

/// Days before a final installment that a plan counts as expiring soon.
pub const EXPIRING_WINDOW_DAYS: i64 = 7;

const DAY_NAMES: [(&str, u8); 14] = [
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
    ("sun", 0),
    ("mon", 1),
    ("tue", 2),
    ("wed", 3),
    ("thu", 4),
    ("fri", 5),
    ("sat", 6),
];

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}

/// The injected clock seam: commands take an optional `as-of` date and
/// only fall back to the system date when none is supplied.
pub(crate) fn resolve_as_of(as_of: Option<&str>, command: &str) -> ClientResult<NaiveDate> {
    match as_of {
        Some(value) => parse_date_strict(value, "as-of", command),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub(crate) fn parse_date_strict(
    value: &str,
    field_name: &str,
    command: &str,
) -> ClientResult<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        )
    })
}

pub(crate) fn parse_amount(
    value: &str,
    field_name: &str,
    command: &str,
) -> ClientResult<Decimal> {
    value.trim().parse::<Decimal>().map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must be a decimal amount like 1200.00."),
            Some(command),
        )
    })
}

pub(crate) fn parse_frequency(value: &str, command: &str) -> ClientResult<Frequency> {
    Frequency::parse(value).map_err(|_| {
        let allowed = Frequency::ALL
            .iter()
            .map(|frequency| frequency.as_str())
            .collect::<Vec<&str>>()
            .join(", ");
        ClientError::invalid_argument_for_command(
            &format!("`frequency` must be one of: {allowed}."),
            Some(command),
        )
    })
}

pub(crate) fn parse_day_of_week(value: &str, command: &str) -> ClientResult<u8> {
    let normalized = value.trim().to_ascii_lowercase();
    if let Ok(number) = normalized.parse::<u8>()
        && number <= 6
    {
        return Ok(number);
    }
    for (name, number) in DAY_NAMES {
        if name == normalized {
            return Ok(number);
        }
    }
    Err(ClientError::invalid_argument_for_command(
        "`day-of-week` must be 0-6 or a weekday name (0 = Sunday).",
        Some(command),
    ))
}

pub(crate) fn parse_status(value: &str, command: &str) -> ClientResult<PlanStatus> {
    PlanStatus::parse(value).ok_or_else(|| {
        let allowed = PlanStatus::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<&str>>()
            .join(", ");
        ClientError::invalid_argument_for_command(
            &format!("`status` must be one of: {allowed}."),
            Some(command),
        )
    })
}

pub(crate) fn parse_currency(value: &str, command: &str) -> ClientResult<String> {
    let normalized = value.trim().to_ascii_uppercase();
    if normalized.len() != 3 || !normalized.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return Err(ClientError::invalid_argument_for_command(
            "`currency` must be a 3-letter code like USD.",
            Some(command),
        ));
    }
    Ok(normalized)
}

pub(crate) fn plan_row(plan: &PayoutPlan) -> PlanRow {
    PlanRow {
        plan_id: plan.plan_id.clone(),
        status: plan.status.as_str().to_string(),
        currency: plan.currency.clone(),
        total_amount: money_string(plan.total_amount),
        payout_amount: money_string(plan.payout_amount),
        frequency: plan.frequency.as_str().to_string(),
        day_of_week: plan.day_of_week,
        installment_count: plan.installment_count,
        completed_installments: plan.completed_installments,
        start_date: plan.start_date().map(|date| format_iso_date(&date)),
        next_due_on: plan.next_pending_date().map(|date| format_iso_date(&date)),
        progress_percent: progress::progress_percent(plan),
        emergency_withdrawal: plan.emergency_withdrawal_enabled,
        created_at: plan.created_at.clone(),
    }
}

pub(crate) fn schedule_entries(plan: &PayoutPlan) -> Vec<ScheduleEntry> {
    plan.schedule
        .iter()
        .enumerate()
        .map(|(index, due_on)| ScheduleEntry {
            seq: index + 1,
            due_on: format_iso_date(due_on),
            amount: money_string(plan.installment_amount(index)),
            disbursed: index < plan.completed_installments,
        })
        .collect()
}

pub(crate) fn progress_summary(plan: &PayoutPlan, today: NaiveDate) -> ProgressSummary {
    ProgressSummary {
        progress_percent: progress::progress_percent(plan),
        amount_disbursed: money_string(progress::amount_disbursed(plan)),
        amount_remaining: money_string(progress::amount_remaining(plan)),
        installments_remaining: progress::installments_remaining(plan),
        next_due_on: plan.next_pending_date().map(|date| format_iso_date(&date)),
        days_until_next: progress::days_until_next(plan, today),
        expiring_soon: progress::is_expiring_soon(plan, today, EXPIRING_WINDOW_DAYS),
    }
}
