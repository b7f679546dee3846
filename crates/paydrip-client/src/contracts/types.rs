use serde::Serialize;

/// Flat plan summary used by list, show, and mutation envelopes. Amounts
/// are canonical 2-decimal strings so the contract never leaks float
/// representation.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub plan_id: String,
    pub status: String,
    pub currency: String,
    pub total_amount: String,
    pub payout_amount: String,
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    pub installment_count: usize,
    pub completed_installments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_on: Option<String>,
    pub progress_percent: u32,
    pub emergency_withdrawal: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub seq: usize,
    pub due_on: String,
    pub amount: String,
    pub disbursed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub progress_percent: u32,
    pub amount_disbursed: String,
    pub amount_remaining: String,
    pub installments_remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_next: Option<i64>,
    pub expiring_soon: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanCreateData {
    pub plan: PlanRow,
    pub schedule: Vec<ScheduleEntry>,
    pub message: String,
    pub next_step: NextStep,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextStep {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanListData {
    pub rows: Vec<PlanRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDetailData {
    pub plan: PlanRow,
    pub schedule: Vec<ScheduleEntry>,
    pub progress: ProgressSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionData {
    pub plan_id: String,
    pub previous_status: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payable_on: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisburseData {
    pub plan_id: String,
    pub seq: usize,
    pub due_on: String,
    pub amount: String,
    pub currency: String,
    pub completed_installments: usize,
    pub installment_count: usize,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_on: Option<String>,
    pub plan_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewData {
    pub currency: String,
    pub total_amount: String,
    pub payout_amount: String,
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    pub installment_count: usize,
    pub start_date: String,
    pub end_date: String,
    pub final_installment_amount: String,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationOptionRow {
    pub installment_count: usize,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsData {
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments_per_month: Option<f64>,
    pub options: Vec<DurationOptionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringRow {
    pub plan_id: String,
    pub due_on: String,
    pub amount: String,
    pub currency: String,
    pub days_until_due: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringData {
    pub as_of: String,
    pub within_days: i64,
    pub rows: Vec<ExpiringRow>,
}
