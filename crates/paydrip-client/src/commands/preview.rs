use chrono::NaiveDate;

use crate::ClientResult;
use crate::commands::common::{
    parse_amount, parse_currency, parse_date_strict, parse_day_of_week, parse_frequency,
    resolve_as_of, schedule_entries,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::PreviewData;
use crate::engine::allocate::money_string;
use crate::engine::dates::format_iso_date;
use crate::engine::plan::{PayoutPlan, PlanRequest};
use crate::error::ClientError;

#[derive(Debug, Default)]
pub struct PreviewOptions {
    pub total: String,
    pub currency: Option<String>,
    pub frequency: String,
    pub day_of_week: Option<String>,
    pub dates: Vec<String>,
    pub installments: Option<u32>,
    pub payout_amount: Option<String>,
    pub start: Option<String>,
    pub as_of: Option<String>,
}

/// Compute the allocation and full schedule for prospective plan input
/// without persisting anything. Pure: identical input and `as-of` date
/// always render the same preview.
pub fn run(options: PreviewOptions) -> ClientResult<SuccessEnvelope> {
    let command = "preview";
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
        emergency_withdrawal_enabled: false,
    };

    let plan = PayoutPlan::from_request(request, "preview".to_string(), today, "0".to_string())
        .map_err(ClientError::from)?;

    let start = plan.start_date().map(|date| format_iso_date(&date));
    let end = plan.schedule.last().map(format_iso_date);
    let final_index = plan.installment_count.saturating_sub(1);

    let data = PreviewData {
        currency: plan.currency.clone(),
        total_amount: money_string(plan.total_amount),
        payout_amount: money_string(plan.payout_amount),
        frequency: plan.frequency.as_str().to_string(),
        day_of_week: plan.day_of_week,
        installment_count: plan.installment_count,
        start_date: start.unwrap_or_default(),
        end_date: end.unwrap_or_default(),
        final_installment_amount: money_string(plan.installment_amount(final_index)),
        schedule: schedule_entries(&plan),
    };

    success(command, data)
}
