use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_frequency_name(value: &str) -> Result<String, String> {
    match value {
        "daily" | "weekly" | "weekly_specific" | "biweekly" | "monthly" | "end_of_month"
        | "quarterly" | "biannual" | "annually" | "custom" => Ok(value.to_string()),
        _ => Err(
            "frequency must be one of: daily, weekly, weekly_specific, biweekly, monthly, \
             end_of_month, quarterly, biannual, annually, custom"
                .to_string(),
        ),
    }
}

pub fn parse_status_name(value: &str) -> Result<String, String> {
    match value {
        "draft" | "active" | "paused" | "completed" | "cancelled" => Ok(value.to_string()),
        _ => Err("status must be one of: draft, active, paused, completed, cancelled".to_string()),
    }
}

/// Extended help shown after `paydrip plan create --help`.
pub const PLAN_CREATE_AFTER_HELP: &str = "\
How plans work:
  A plan locks a total amount and pays it back in installments on a
  chosen cadence. Plans are created as drafts; activate a draft to start
  recording disbursements against it.

What to do next:
  1. Run `paydrip options --frequency <frequency>` to see duration presets.
  2. Run `paydrip preview` with the same flags to check the schedule
     before anything is saved.
  3. Run `paydrip plan create ...` (add --activate to skip the draft step).
  4. Record each completed payout with `paydrip plan disburse <plan-id>`.

Field rules (very explicit):
  --total (required):
    The amount to lock, as a decimal like 1200.00. Must be positive.

  --frequency (required):
    One of: daily, weekly, weekly_specific, biweekly, monthly,
    end_of_month, quarterly, biannual, annually, custom.

  --installments | --payout-amount (one of, except custom):
    Give an installment count, or a fixed per-installment amount and the
    count becomes floor(total / payout). The final installment always
    absorbs any rounding remainder.

  --day-of-week (weekly_specific only):
    0-6 or a weekday name, 0 = Sunday. The first payout lands on the
    first matching weekday on or after the start date.

  --date (custom only, repeatable):
    Explicit payout dates as YYYY-MM-DD. Order does not matter; repeats
    are dropped. The installment count is the number of distinct dates.

  --start (optional):
    First payout date, YYYY-MM-DD. Defaults to today.

  --emergency-withdrawal (optional):
    Allow an early release of remaining funds. Fixed at creation.

Examples:
  paydrip plan create --total 120000 --frequency monthly --installments 12
  paydrip plan create --total 500 --frequency weekly_specific \\
      --day-of-week friday --installments 10 --activate
  paydrip plan create --total 900 --frequency custom \\
      --date 2026-03-01 --date 2026-06-01 --date 2026-09-01
";

#[derive(Debug, Parser)]
#[command(
    name = "paydrip",
    version,
    about = "recurring payout plan scheduler",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Plan input flags shared by `plan create` and `preview`.
#[derive(Debug, Clone, Args)]
pub struct PlanSpecArgs {
    /// Total amount to lock and disburse (e.g. 1200.00)
    #[arg(long)]
    pub total: String,
    /// 3-letter currency code
    #[arg(long)]
    pub currency: Option<String>,
    /// Payout cadence
    #[arg(long, value_parser = parse_frequency_name)]
    pub frequency: String,
    /// Weekday for weekly_specific: 0-6 or a name (0 = Sunday)
    #[arg(long)]
    pub day_of_week: Option<String>,
    /// Explicit payout date for custom schedules (repeatable, YYYY-MM-DD)
    #[arg(long = "date", value_parser = parse_iso_date)]
    pub dates: Vec<IsoDate>,
    /// Number of installments
    #[arg(long)]
    pub installments: Option<u32>,
    /// Fixed per-installment amount instead of --installments
    #[arg(long)]
    pub payout_amount: Option<String>,
    /// First payout date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_iso_date)]
    pub start: Option<IsoDate>,
    /// Compute dates as of this day instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub as_of: Option<IsoDate>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create and manage payout plans
    #[command(arg_required_else_help = true)]
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Preview an allocation and schedule without saving anything
    Preview {
        #[command(flatten)]
        spec: PlanSpecArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show duration presets and the per-month rate for a cadence
    Options {
        /// Payout cadence to describe
        #[arg(long, value_parser = parse_frequency_name)]
        frequency: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List active plans whose final installment is due soon
    Expiring {
        /// Reminder window in days (default 7)
        #[arg(long)]
        within: Option<i64>,
        /// Evaluate as of this day instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PlanCommand {
    /// Create a payout plan (draft by default)
    #[command(after_long_help = PLAN_CREATE_AFTER_HELP)]
    Create {
        #[command(flatten)]
        spec: PlanSpecArgs,
        /// Allow an out-of-band early release of remaining funds
        #[arg(long)]
        emergency_withdrawal: bool,
        /// Activate the plan immediately instead of leaving a draft
        #[arg(long)]
        activate: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List plans, optionally filtered by status
    List {
        /// Status filter: draft, active, paused, completed, or cancelled
        #[arg(long, value_parser = parse_status_name)]
        status: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one plan with its schedule and progress
    Show {
        /// The plan id to inspect (e.g. plan_abc123)
        plan_id: String,
        /// Evaluate progress as of this day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Activate a draft plan
    Activate {
        /// The plan id to activate
        plan_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Pause an active plan
    Pause {
        /// The plan id to pause
        plan_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Resume a paused plan
    Resume {
        /// The plan id to resume
        plan_id: String,
        /// Evaluate the next payable date as of this day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Cancel a plan (terminal)
    Cancel {
        /// The plan id to cancel
        plan_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Record one successful disbursement against an active plan
    Disburse {
        /// The plan id receiving the disbursement
        plan_id: String,
        /// Evaluate reminder windows as of this day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
