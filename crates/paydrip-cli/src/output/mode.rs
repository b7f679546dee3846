use crate::cli::{Commands, PlanCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Plan { command } => match command {
            PlanCommand::Create { json, .. }
            | PlanCommand::List { json, .. }
            | PlanCommand::Show { json, .. }
            | PlanCommand::Activate { json, .. }
            | PlanCommand::Pause { json, .. }
            | PlanCommand::Resume { json, .. }
            | PlanCommand::Cancel { json, .. }
            | PlanCommand::Disburse { json, .. } => *json,
        },
        Commands::Preview { json, .. }
        | Commands::Options { json, .. }
        | Commands::Expiring { json, .. } => *json,
    };

    if json { OutputMode::Json } else { OutputMode::Text }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_when_the_flag_is_present() {
        let cases: [Vec<&str>; 4] = [
            vec![
                "paydrip", "plan", "create", "--total", "100", "--frequency", "weekly",
                "--installments", "4", "--json",
            ],
            vec!["paydrip", "plan", "list", "--json"],
            vec!["paydrip", "plan", "disburse", "plan_1", "--json"],
            vec!["paydrip", "expiring", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn mode_defaults_to_text() {
        let parsed = parse_from(["paydrip", "plan", "list"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }

        let options = parse_from(["paydrip", "options", "--frequency", "daily"]);
        assert!(options.is_ok());
        if let Ok(cli) = options {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
