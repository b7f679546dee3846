use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::plan::PayoutPlan;

/// Whole-percent completion, rounded to the nearest integer.
pub fn progress_percent(plan: &PayoutPlan) -> u32 {
    if plan.installment_count == 0 {
        return 0;
    }
    let ratio = plan.completed_installments as f64 / plan.installment_count as f64;
    (ratio * 100.0).round() as u32
}

/// Total already paid out. Once every installment is consumed this is the
/// locked total exactly, because the final installment absorbs the
/// rounding remainder.
pub fn amount_disbursed(plan: &PayoutPlan) -> Decimal {
    if plan.completed_installments >= plan.installment_count {
        return plan.total_amount;
    }
    plan.payout_amount * Decimal::from(plan.completed_installments as u64)
}

/// Remaining balance is the total minus what was disbursed, never a
/// per-installment multiple.
pub fn amount_remaining(plan: &PayoutPlan) -> Decimal {
    plan.total_amount - amount_disbursed(plan)
}

pub fn installments_remaining(plan: &PayoutPlan) -> usize {
    plan.installment_count
        .saturating_sub(plan.completed_installments)
}

/// Days from `today` to the next pending disbursement; negative when the
/// pending date is already in the past.
pub fn days_until_next(plan: &PayoutPlan, today: NaiveDate) -> Option<i64> {
    plan.next_pending_date().map(|due| (due - today).num_days())
}

/// A plan is expiring soon when exactly one installment remains and its
/// date is within `threshold_days` of `today` (or already past).
pub fn is_expiring_soon(plan: &PayoutPlan, today: NaiveDate, threshold_days: i64) -> bool {
    if installments_remaining(plan) != 1 {
        return false;
    }
    match days_until_next(plan, today) {
        Some(days) => days <= threshold_days,
        None => false,
    }
}
