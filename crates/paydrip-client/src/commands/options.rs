use crate::ClientResult;
use crate::commands::common::parse_frequency;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{DurationOptionRow, OptionsData};
use crate::engine::catalog::{duration_options, installments_per_month};

/// Catalog surface: the valid duration presets for a frequency, plus the
/// average installments-per-month conversion rate.
pub fn run(frequency: &str) -> ClientResult<SuccessEnvelope> {
    let command = "options";
    let parsed = parse_frequency(frequency, command)?;

    let rows = duration_options(parsed, 0)
        .into_iter()
        .map(|option| DurationOptionRow {
            installment_count: option.installment_count,
            label: option.label,
            description: option.description,
        })
        .collect::<Vec<DurationOptionRow>>();

    let data = OptionsData {
        frequency: parsed.as_str().to_string(),
        installments_per_month: installments_per_month(parsed),
        options: rows,
    };

    success(command, data)
}
