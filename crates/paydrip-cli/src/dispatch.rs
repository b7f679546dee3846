use paydrip_client::commands::disburse::{self, DisburseOptions};
use paydrip_client::commands::expiring::{self, ExpiringOptions};
use paydrip_client::commands::options;
use paydrip_client::commands::plan::{self, CreatePlanOptions, ListPlanOptions, ShowPlanOptions};
use paydrip_client::commands::preview::{self, PreviewOptions};
use paydrip_client::commands::transition::{self, TransitionOptions};
use paydrip_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, IsoDate, PlanCommand, PlanSpecArgs};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Plan { command } => dispatch_plan(command),
        Commands::Preview { spec, .. } => preview::run(preview_options(spec)),
        Commands::Options { frequency, .. } => options::run(frequency),
        Commands::Expiring { within, as_of, .. } => expiring::run(ExpiringOptions {
            within_days: *within,
            as_of: iso_string(as_of),
            home_override: None,
        }),
    }
}

fn dispatch_plan(command: &PlanCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        PlanCommand::Create {
            spec,
            emergency_withdrawal,
            activate,
            ..
        } => plan::create(create_options(spec, *emergency_withdrawal, *activate)),
        PlanCommand::List { status, .. } => plan::list(ListPlanOptions {
            status: status.clone(),
            home_override: None,
        }),
        PlanCommand::Show { plan_id, as_of, .. } => plan::show(ShowPlanOptions {
            plan_id: plan_id.clone(),
            as_of: iso_string(as_of),
            home_override: None,
        }),
        PlanCommand::Activate { plan_id, .. } => {
            transition::activate(transition_options(plan_id, &None))
        }
        PlanCommand::Pause { plan_id, .. } => transition::pause(transition_options(plan_id, &None)),
        PlanCommand::Resume { plan_id, as_of, .. } => {
            transition::resume(transition_options(plan_id, as_of))
        }
        PlanCommand::Cancel { plan_id, .. } => {
            transition::cancel(transition_options(plan_id, &None))
        }
        PlanCommand::Disburse { plan_id, as_of, .. } => disburse::run(DisburseOptions {
            plan_id: plan_id.clone(),
            as_of: iso_string(as_of),
            home_override: None,
        }),
    }
}

fn create_options(
    spec: &PlanSpecArgs,
    emergency_withdrawal: bool,
    activate: bool,
) -> CreatePlanOptions<'static> {
    CreatePlanOptions {
        total: spec.total.clone(),
        currency: spec.currency.clone(),
        frequency: spec.frequency.clone(),
        day_of_week: spec.day_of_week.clone(),
        dates: spec.dates.iter().map(|date| date.as_str().to_string()).collect(),
        installments: spec.installments,
        payout_amount: spec.payout_amount.clone(),
        start: iso_string(&spec.start),
        emergency_withdrawal,
        activate,
        as_of: iso_string(&spec.as_of),
        home_override: None,
    }
}

fn preview_options(spec: &PlanSpecArgs) -> PreviewOptions {
    PreviewOptions {
        total: spec.total.clone(),
        currency: spec.currency.clone(),
        frequency: spec.frequency.clone(),
        day_of_week: spec.day_of_week.clone(),
        dates: spec.dates.iter().map(|date| date.as_str().to_string()).collect(),
        installments: spec.installments,
        payout_amount: spec.payout_amount.clone(),
        start: iso_string(&spec.start),
        as_of: iso_string(&spec.as_of),
    }
}

fn transition_options(plan_id: &str, as_of: &Option<IsoDate>) -> TransitionOptions<'static> {
    TransitionOptions {
        plan_id: plan_id.to_string(),
        as_of: iso_string(as_of),
        home_override: None,
    }
}

fn iso_string(value: &Option<IsoDate>) -> Option<String> {
    value.as_ref().map(|date| date.as_str().to_string())
}
