use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::ScheduleError;
use crate::engine::allocate::{
    allocate_by_amount, allocate_by_count, installment_amount, round_money,
};
use crate::engine::catalog::validate_config;
use crate::engine::dates::generate;
use crate::engine::frequency::Frequency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl PlanStatus {
    pub const ALL: [PlanStatus; 5] = [
        Self::Draft,
        Self::Active,
        Self::Paused,
        Self::Completed,
        Self::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
    }

    /// No transitions leave `Completed` or `Cancelled`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Input collected from the plan-builder flow, validated as a whole before
/// any plan is constructed.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub total_amount: Decimal,
    pub currency: String,
    pub frequency: Frequency,
    pub day_of_week: Option<u8>,
    pub custom_dates: Vec<NaiveDate>,
    pub installment_count: Option<usize>,
    pub payout_amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub emergency_withdrawal_enabled: bool,
}

/// A scheduled series of disbursements from a locked total amount.
///
/// A plan that passed construction is internally consistent: the schedule
/// length equals the installment count, dates are strictly increasing, and
/// amounts are positive. Status changes only through the transition
/// methods below.
#[derive(Debug, Clone)]
pub struct PayoutPlan {
    pub plan_id: String,
    pub status: PlanStatus,
    pub currency: String,
    pub total_amount: Decimal,
    pub payout_amount: Decimal,
    pub frequency: Frequency,
    pub day_of_week: Option<u8>,
    pub installment_count: usize,
    pub completed_installments: usize,
    pub schedule: Vec<NaiveDate>,
    pub emergency_withdrawal_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl PayoutPlan {
    /// Build a draft plan from validated input.
    ///
    /// Validation order: frequency configuration, then allocation, then
    /// date generation. A constructed plan is always internally consistent.
    pub fn from_request(
        request: PlanRequest,
        plan_id: String,
        today: NaiveDate,
        timestamp: String,
    ) -> Result<Self, ScheduleError> {
        validate_config(
            request.frequency,
            request.day_of_week,
            &request.custom_dates,
        )?;

        let start_reference = request.start_date.unwrap_or(today);

        if request.frequency.is_custom() {
            if request.payout_amount.is_some() {
                return Err(ScheduleError::InvalidAllocation {
                    reason: "a payout amount override does not apply to custom schedules"
                        .to_string(),
                });
            }
            let schedule = generate(
                request.frequency,
                start_reference,
                0,
                None,
                &request.custom_dates,
            )?;
            let installment_count = schedule.len();
            let payout_amount = allocate_by_count(request.total_amount, installment_count)?;
            return Ok(Self::assemble(
                request,
                plan_id,
                timestamp,
                payout_amount,
                installment_count,
                schedule,
            ));
        }

        let (installment_count, payout_amount) =
            match (request.installment_count, request.payout_amount) {
                (Some(count), None) => (count, allocate_by_count(request.total_amount, count)?),
                (None, Some(payout)) => {
                    let count = allocate_by_amount(request.total_amount, payout)?;
                    (count, round_money(payout))
                }
                (Some(_), Some(_)) => {
                    return Err(ScheduleError::InvalidAllocation {
                        reason: "provide either an installment count or a payout amount, not both"
                            .to_string(),
                    });
                }
                (None, None) => {
                    return Err(ScheduleError::InvalidAllocation {
                        reason: "an installment count or a payout amount is required".to_string(),
                    });
                }
            };

        let schedule = generate(
            request.frequency,
            start_reference,
            installment_count,
            request.day_of_week,
            &[],
        )?;

        Ok(Self::assemble(
            request,
            plan_id,
            timestamp,
            payout_amount,
            installment_count,
            schedule,
        ))
    }

    fn assemble(
        request: PlanRequest,
        plan_id: String,
        timestamp: String,
        payout_amount: Decimal,
        installment_count: usize,
        schedule: Vec<NaiveDate>,
    ) -> Self {
        let mut total_amount = round_money(request.total_amount);
        total_amount.rescale(2);
        let mut payout_amount = payout_amount;
        payout_amount.rescale(2);

        Self {
            plan_id,
            status: PlanStatus::Draft,
            currency: request.currency,
            total_amount,
            payout_amount,
            frequency: request.frequency,
            day_of_week: request.day_of_week,
            installment_count,
            completed_installments: 0,
            schedule,
            emergency_withdrawal_enabled: request.emergency_withdrawal_enabled,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.schedule.first().copied()
    }

    /// The next unconsumed schedule entry, if any installments remain.
    pub fn next_pending_date(&self) -> Option<NaiveDate> {
        self.schedule.get(self.completed_installments).copied()
    }

    /// The soonest remaining scheduled date on or after `today`, for
    /// display after a resume. Dates missed while paused stay queued and
    /// are still consumed in order by disbursements; the schedule itself
    /// never shifts.
    pub fn next_payable_on_or_after(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.schedule
            .iter()
            .skip(self.completed_installments)
            .copied()
            .find(|due| *due >= today)
            .or_else(|| self.next_pending_date())
    }

    /// Amount of the installment at `index`; the final installment absorbs
    /// the rounding remainder.
    pub fn installment_amount(&self, index: usize) -> Decimal {
        installment_amount(
            self.total_amount,
            self.payout_amount,
            self.installment_count,
            index,
        )
    }

    pub fn activate(&mut self) -> Result<(), ScheduleError> {
        if self.status != PlanStatus::Draft {
            return Err(ScheduleError::InvalidTransition {
                action: "activate",
                status: self.status,
            });
        }
        if self.schedule.is_empty() || self.total_amount <= Decimal::ZERO {
            return Err(ScheduleError::InvalidAllocation {
                reason: "a plan needs a schedule and a positive total before activation"
                    .to_string(),
            });
        }
        self.status = PlanStatus::Active;
        Ok(())
    }

    /// Pausing stops disbursements; the schedule and completed count are
    /// untouched.
    pub fn pause(&mut self) -> Result<(), ScheduleError> {
        if self.status != PlanStatus::Active {
            return Err(ScheduleError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }
        self.status = PlanStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), ScheduleError> {
        if self.status != PlanStatus::Paused {
            return Err(ScheduleError::InvalidTransition {
                action: "resume",
                status: self.status,
            });
        }
        self.status = PlanStatus::Active;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), ScheduleError> {
        if self.status.is_terminal() {
            return Err(ScheduleError::InvalidTransition {
                action: "cancel",
                status: self.status,
            });
        }
        self.status = PlanStatus::Cancelled;
        Ok(())
    }

    /// Record one successful disbursement. Completes the plan exactly when
    /// the final installment is consumed.
    pub fn record_disbursement(&mut self) -> Result<(), ScheduleError> {
        if self.status != PlanStatus::Active {
            return Err(ScheduleError::PlanNotActive {
                status: self.status,
            });
        }
        self.completed_installments += 1;
        if self.completed_installments >= self.installment_count {
            self.completed_installments = self.installment_count;
            self.status = PlanStatus::Completed;
        }
        Ok(())
    }
}
