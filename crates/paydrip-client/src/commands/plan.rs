use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::ClientResult;
use crate::commands::common::{
    load_setup, parse_amount, parse_currency, parse_date_strict, parse_day_of_week,
    parse_frequency, parse_status, plan_row, progress_summary, resolve_as_of, schedule_entries,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{NextStep, PlanCreateData, PlanDetailData, PlanListData};
use crate::engine::plan::{PayoutPlan, PlanRequest, PlanStatus};
use crate::error::ClientError;
use crate::state::open_connection;
use crate::store::{load_plan, load_plans, new_plan_id, now_timestamp, persist_plan};

#[derive(Debug, Default)]
pub struct CreatePlanOptions<'a> {
    pub total: String,
    pub currency: Option<String>,
    pub frequency: String,
    pub day_of_week: Option<String>,
    pub dates: Vec<String>,
    pub installments: Option<u32>,
    pub payout_amount: Option<String>,
    pub start: Option<String>,
    pub emergency_withdrawal: bool,
    pub activate: bool,
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn create(options: CreatePlanOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let command = "plan create";
    let setup = load_setup(options.home_override)?;
    let today = resolve_as_of(options.as_of.as_deref(), command)?;

    let frequency = parse_frequency(&options.frequency, command)?;
    let total_amount = parse_amount(&options.total, "total", command)?;
    let currency = parse_currency(options.currency.as_deref().unwrap_or("USD"), command)?;
    let payout_amount = match options.payout_amount.as_deref() {
        Some(value) => Some(parse_amount(value, "payout-amount", command)?),
        None => None,
    };
    let day_of_week = match options.day_of_week.as_deref() {
        Some(value) => Some(parse_day_of_week(value, command)?),
        None => None,
    };
    let start_date = match options.start.as_deref() {
        Some(value) => Some(parse_date_strict(value, "start", command)?),
        None => None,
    };
    // Generated schedules never begin before the plan exists; custom dates
    // are exempt and may be whatever the caller supplied.
    if let Some(start) = start_date
        && !frequency.is_custom()
        && start < today
    {
        return Err(ClientError::invalid_argument_for_command(
            "`start` must be on or after the as-of date.",
            Some(command),
        ));
    }
    let mut custom_dates: Vec<NaiveDate> = Vec::with_capacity(options.dates.len());
    for raw_date in &options.dates {
        custom_dates.push(parse_date_strict(raw_date, "date", command)?);
    }

    let request = PlanRequest {
        total_amount,
        currency,
        frequency,
        day_of_week,
        custom_dates,
        installment_count: options.installments.map(|count| count as usize),
        payout_amount,
        start_date,
        emergency_withdrawal_enabled: options.emergency_withdrawal,
    };

    let mut plan = PayoutPlan::from_request(request, new_plan_id(), today, now_timestamp())
        .map_err(ClientError::from)?;
    if options.activate {
        plan.activate().map_err(ClientError::from)?;
    }

    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;
    persist_plan(&mut connection, &db_path, &plan)?;

    let (message, next_step) = if plan.status == PlanStatus::Active {
        (
            "Plan created and activated.".to_string(),
            NextStep {
                label: "Record the first disbursement".to_string(),
                command: format!("paydrip plan disburse {}", plan.plan_id),
            },
        )
    } else {
        (
            "Plan created in draft status.".to_string(),
            NextStep {
                label: "Activate the plan".to_string(),
                command: format!("paydrip plan activate {}", plan.plan_id),
            },
        )
    };

    let data = PlanCreateData {
        plan: plan_row(&plan),
        schedule: schedule_entries(&plan),
        message,
        next_step,
    };

    success(command, data)
}

#[derive(Debug, Default)]
pub struct ListPlanOptions<'a> {
    pub status: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn list(options: ListPlanOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let command = "plan list";
    let setup = load_setup(options.home_override)?;
    let status_filter = match options.status.as_deref() {
        Some(value) => Some(parse_status(value, command)?),
        None => None,
    };

    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let plans = load_plans(&connection, &db_path, status_filter)?;

    let data = PlanListData {
        rows: plans.iter().map(plan_row).collect(),
    };

    success(command, data)
}

#[derive(Debug, Default)]
pub struct ShowPlanOptions<'a> {
    pub plan_id: String,
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn show(options: ShowPlanOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let command = "plan show";
    let setup = load_setup(options.home_override)?;
    let today = resolve_as_of(options.as_of.as_deref(), command)?;

    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let plan = load_plan(&connection, &db_path, &options.plan_id)?
        .ok_or_else(|| ClientError::plan_not_found(&options.plan_id))?;

    let data = PlanDetailData {
        plan: plan_row(&plan),
        schedule: schedule_entries(&plan),
        progress: progress_summary(&plan, today),
    };

    success(command, data)
}
