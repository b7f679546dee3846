use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use ulid::Ulid;

use crate::engine::ScheduleError;
use crate::engine::allocate::money_string;
use crate::engine::dates::{format_iso_date, parse_iso_date};
use crate::engine::frequency::Frequency;
use crate::engine::plan::{PayoutPlan, PlanStatus};
use crate::state::map_sqlite_error;
use crate::{ClientError, ClientResult};

pub(crate) fn new_plan_id() -> String {
    format!("plan_{}", Ulid::new())
}

pub(crate) fn now_timestamp() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH);
    match now {
        Ok(duration) => format!("{}", duration.as_secs()),
        Err(_) => "0".to_string(),
    }
}

/// Insert a freshly constructed plan and its full schedule in one
/// immediate transaction.
pub(crate) fn persist_plan(
    connection: &mut Connection,
    db_path: &Path,
    plan: &PayoutPlan,
) -> ClientResult<()> {
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .execute(
            "INSERT INTO internal_plans (
                plan_id,
                status,
                currency,
                total_amount,
                payout_amount,
                frequency,
                day_of_week,
                installment_count,
                completed_installments,
                start_date,
                emergency_withdrawal,
                created_at,
                updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &plan.plan_id,
                plan.status.as_str(),
                &plan.currency,
                money_string(plan.total_amount),
                money_string(plan.payout_amount),
                plan.frequency.as_str(),
                plan.day_of_week.map(i64::from),
                plan.installment_count as i64,
                plan.completed_installments as i64,
                plan.start_date().map(|date| format_iso_date(&date)),
                i64::from(plan.emergency_withdrawal_enabled),
                &plan.created_at,
                &plan.updated_at,
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    for (index, due_on) in plan.schedule.iter().enumerate() {
        transaction
            .execute(
                "INSERT INTO internal_plan_schedule (plan_id, seq, due_on)
                 VALUES (?1, ?2, ?3)",
                params![&plan.plan_id, index as i64, format_iso_date(due_on)],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))
}

pub(crate) fn load_plan(
    connection: &Connection,
    db_path: &Path,
    plan_id: &str,
) -> ClientResult<Option<PayoutPlan>> {
    let row = connection
        .query_row(
            "SELECT
                plan_id,
                status,
                currency,
                total_amount,
                payout_amount,
                frequency,
                day_of_week,
                installment_count,
                completed_installments,
                emergency_withdrawal,
                created_at,
                updated_at
             FROM internal_plans
             WHERE plan_id = ?1
             LIMIT 1",
            [plan_id],
            raw_plan_from_row,
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let Some(raw) = row else {
        return Ok(None);
    };

    let schedule = load_schedule(connection, db_path, plan_id)?;
    Ok(Some(assemble_plan(raw, schedule, db_path)?))
}

pub(crate) fn load_plans(
    connection: &Connection,
    db_path: &Path,
    status: Option<PlanStatus>,
) -> ClientResult<Vec<PayoutPlan>> {
    let status_bound = status.map(|value| value.as_str().to_string());
    let mut statement = connection
        .prepare(
            "SELECT
                plan_id,
                status,
                currency,
                total_amount,
                payout_amount,
                frequency,
                day_of_week,
                installment_count,
                completed_installments,
                emergency_withdrawal,
                created_at,
                updated_at
             FROM internal_plans
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at ASC, plan_id ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map(params![status_bound], raw_plan_from_row)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut raw_rows = Vec::new();
    for row in rows_iter {
        raw_rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    let mut plans = Vec::with_capacity(raw_rows.len());
    for raw in raw_rows {
        let schedule = load_schedule(connection, db_path, &raw.plan_id)?;
        plans.push(assemble_plan(raw, schedule, db_path)?);
    }

    Ok(plans)
}

/// Load a plan, apply a pure state-machine action, and write the result,
/// all inside one immediate transaction. Concurrent mutations of the same
/// plan serialize here, and a retried call observes the already-applied
/// state rather than double-applying.
pub(crate) fn with_plan_mut<F>(
    connection: &mut Connection,
    db_path: &Path,
    plan_id: &str,
    action: F,
) -> ClientResult<PayoutPlan>
where
    F: FnOnce(&mut PayoutPlan) -> Result<(), ScheduleError>,
{
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut plan = load_plan(&transaction, db_path, plan_id)?
        .ok_or_else(|| ClientError::plan_not_found(plan_id))?;

    action(&mut plan).map_err(ClientError::from)?;
    plan.updated_at = now_timestamp();

    transaction
        .execute(
            "UPDATE internal_plans
             SET status = ?2,
                 completed_installments = ?3,
                 updated_at = ?4
             WHERE plan_id = ?1",
            params![
                plan_id,
                plan.status.as_str(),
                plan.completed_installments as i64,
                &plan.updated_at,
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(plan)
}

struct RawPlanRow {
    plan_id: String,
    status: String,
    currency: String,
    total_amount: String,
    payout_amount: String,
    frequency: String,
    day_of_week: Option<i64>,
    installment_count: i64,
    completed_installments: i64,
    emergency_withdrawal: i64,
    created_at: String,
    updated_at: String,
}

fn raw_plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPlanRow> {
    Ok(RawPlanRow {
        plan_id: row.get(0)?,
        status: row.get(1)?,
        currency: row.get(2)?,
        total_amount: row.get(3)?,
        payout_amount: row.get(4)?,
        frequency: row.get(5)?,
        day_of_week: row.get(6)?,
        installment_count: row.get(7)?,
        completed_installments: row.get(8)?,
        emergency_withdrawal: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn load_schedule(
    connection: &Connection,
    db_path: &Path,
    plan_id: &str,
) -> ClientResult<Vec<chrono::NaiveDate>> {
    let mut statement = connection
        .prepare(
            "SELECT due_on
             FROM internal_plan_schedule
             WHERE plan_id = ?1
             ORDER BY seq ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([plan_id], |row| row.get::<_, String>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut schedule = Vec::new();
    for row in rows_iter {
        let due_on = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        let parsed =
            parse_iso_date(&due_on).ok_or_else(|| ClientError::planbook_corrupt(db_path))?;
        schedule.push(parsed);
    }

    Ok(schedule)
}

fn assemble_plan(
    raw: RawPlanRow,
    schedule: Vec<chrono::NaiveDate>,
    db_path: &Path,
) -> ClientResult<PayoutPlan> {
    let status = PlanStatus::parse(&raw.status)
        .ok_or_else(|| ClientError::planbook_corrupt(db_path))?;
    let frequency = Frequency::parse(&raw.frequency)
        .map_err(|_| ClientError::planbook_corrupt(db_path))?;
    let total_amount: Decimal = raw
        .total_amount
        .parse()
        .map_err(|_| ClientError::planbook_corrupt(db_path))?;
    let payout_amount: Decimal = raw
        .payout_amount
        .parse()
        .map_err(|_| ClientError::planbook_corrupt(db_path))?;
    let day_of_week = match raw.day_of_week {
        Some(value) => Some(
            u8::try_from(value).map_err(|_| ClientError::planbook_corrupt(db_path))?,
        ),
        None => None,
    };

    Ok(PayoutPlan {
        plan_id: raw.plan_id,
        status,
        currency: raw.currency,
        total_amount,
        payout_amount,
        frequency,
        day_of_week,
        installment_count: usize::try_from(raw.installment_count).unwrap_or(0),
        completed_installments: usize::try_from(raw.completed_installments).unwrap_or(0),
        schedule,
        emergency_withdrawal_enabled: raw.emergency_withdrawal != 0,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}
