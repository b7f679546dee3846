mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use paydrip_client::ClientError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Paydrip - recurring payout plan scheduler

Usage:
  paydrip <command>

Start here:
  paydrip options --frequency monthly
  paydrip preview --help
  paydrip plan create --help
";

const TOP_LEVEL_HELP: &str = "Paydrip — recurring payout plan scheduler

USAGE: paydrip <command>

Build a plan:
  1. paydrip options --frequency <frequency>              See duration presets for a cadence
  2. paydrip preview --total 1200 --frequency monthly --installments 12
                                                          Check the schedule before saving
  3. paydrip plan create --total 1200 --frequency monthly --installments 12
                                                          Save it (add --activate to go live)

Run a plan:
  paydrip plan list                                       List plans and their progress
  paydrip plan show <plan-id>                             One plan with schedule and progress
  paydrip plan disburse <plan-id>                         Record a completed payout
  paydrip plan pause|resume|cancel <plan-id>              Lifecycle controls

Stay ahead of endings:
  paydrip expiring --within 7                             Plans on their final installment

Having issues or unsure about flags?
  Run `paydrip plan create --help` for the full field rules,
  or `paydrip <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) && is_top_level_help_request(&raw_args)
                {
                    if write_stdout_text(TOP_LEVEL_HELP).is_err() {
                        return Err(ExitCode::from(2));
                    }
                } else if write_stdout_text(&err.to_string()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }

            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information"
/// hint) so the recovery steps are the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();
    if non_flags.is_empty() {
        return None;
    }

    let hint = match non_flags.as_slice() {
        ["plan", "create", ..] => Some("plan create"),
        ["plan", "list", ..] => Some("plan list"),
        ["plan", "show", ..] => Some("plan show"),
        ["plan", "activate", ..] => Some("plan activate"),
        ["plan", "pause", ..] => Some("plan pause"),
        ["plan", "resume", ..] => Some("plan resume"),
        ["plan", "cancel", ..] => Some("plan cancel"),
        ["plan", "disburse", ..] => Some("plan disburse"),
        ["plan", ..] => Some("plan"),
        ["preview", ..] => Some("preview"),
        ["options", ..] => Some("options"),
        ["expiring", ..] => Some("expiring"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "planbook_init_permission_denied"
                | "planbook_locked"
                | "planbook_corrupt"
                | "migration_failed"
                | "planbook_init_failed"
        )
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, is_internal_error, strip_clap_boilerplate};
    use paydrip_client::ClientError;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn command_hints_follow_the_subcommand_path() {
        let hint = command_path_from_args(&args(&["paydrip", "plan", "disburse", "--json"]));
        assert_eq!(hint, Some("plan disburse".to_string()));

        let top = command_path_from_args(&args(&["paydrip", "expiring"]));
        assert_eq!(top, Some("expiring".to_string()));

        let none = command_path_from_args(&args(&["paydrip", "--json"]));
        assert_eq!(none, None);
    }

    #[test]
    fn clap_boilerplate_is_stripped_from_parse_errors() {
        let message = "error: invalid value\n\nUsage: paydrip plan create [OPTIONS]";
        assert_eq!(strip_clap_boilerplate(message), "error: invalid value");
    }

    #[test]
    fn planbook_failures_are_internal() {
        let locked = ClientError::planbook_locked(std::path::Path::new("/tmp/planbook.db"));
        assert!(is_internal_error(&locked));

        let user_facing = ClientError::invalid_argument("bad input");
        assert!(!is_internal_error(&user_facing));
    }
}
