use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};
use super::plan_text::{schedule_table, value_display, value_str};

pub fn render_preview(data: &Value) -> io::Result<String> {
    let count = data
        .get("installment_count")
        .and_then(Value::as_u64)
        .ok_or_else(|| io::Error::other("preview output requires an installment count"))?;

    let mut lines = vec![
        format!(
            "{count} installments of {} {}.",
            value_str(data, "payout_amount"),
            value_str(data, "currency")
        ),
        String::new(),
    ];

    let mut entries = vec![
        (
            "Total:",
            format!(
                "{} {}",
                value_str(data, "total_amount"),
                value_str(data, "currency")
            ),
        ),
        ("Frequency:", value_str(data, "frequency").to_string()),
        ("First payout:", value_str(data, "start_date").to_string()),
        ("Last payout:", value_str(data, "end_date").to_string()),
    ];
    if value_str(data, "final_installment_amount") != value_str(data, "payout_amount") {
        entries.push((
            "Final installment:",
            format!(
                "{} {}",
                value_str(data, "final_installment_amount"),
                value_str(data, "currency")
            ),
        ));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    lines.push(String::new());
    lines.push("Schedule:".to_string());
    lines.extend(schedule_table(data.get("schedule")));

    lines.push(String::new());
    lines.push("Nothing is saved yet. Re-run as `paydrip plan create` to keep it.".to_string());

    Ok(lines.join("\n"))
}

pub fn render_options(data: &Value) -> io::Result<String> {
    let frequency = value_str(data, "frequency").to_string();
    let rows = data
        .get("options")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if rows.is_empty() {
        return Ok(format!(
            "No duration presets for `{frequency}`.\n\n\
             Custom schedules take their installment count from the supplied\n\
             `--date` values instead."
        ));
    }

    let mut lines = vec![format!("Duration presets for `{frequency}`:"), String::new()];

    let columns = [
        Column {
            name: "Installments",
            align: Align::Right,
        },
        Column {
            name: "Duration",
            align: Align::Left,
        },
        Column {
            name: "Description",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                value_display(row, "installment_count"),
                value_str(row, "label").to_string(),
                value_str(row, "description").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Preset",
    ));

    if let Some(rate) = data.get("installments_per_month").and_then(Value::as_f64) {
        lines.push(String::new());
        lines.push(format!("Averages {rate:.2} installments per month."));
    }

    Ok(lines.join("\n"))
}

pub fn render_expiring(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("expiring output requires rows"))?;
    let within_days = data.get("within_days").and_then(Value::as_i64).unwrap_or(0);

    if rows.is_empty() {
        return Ok(format!(
            "No plans are expiring within {within_days} days.\n\n\
             A plan shows up here once it is active and only its final\n\
             installment remains."
        ));
    }

    let heading = if rows.len() == 1 {
        format!(
            "1 plan expiring within {within_days} days of {}.",
            value_str(data, "as_of")
        )
    } else {
        format!(
            "{} plans expiring within {within_days} days of {}.",
            rows.len(),
            value_str(data, "as_of")
        )
    };
    let mut lines = vec![heading, String::new()];

    let columns = [
        Column {
            name: "Plan",
            align: Align::Left,
        },
        Column {
            name: "Final Due",
            align: Align::Left,
        },
        Column {
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Days Left",
            align: Align::Right,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                value_str(row, "plan_id").to_string(),
                value_str(row, "due_on").to_string(),
                format!(
                    "{} {}",
                    value_str(row, "amount"),
                    value_str(row, "currency")
                ),
                value_display(row, "days_until_due"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Plan",
    ));

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_expiring, render_options, render_preview};

    #[test]
    fn preview_highlights_a_differing_final_installment() {
        let payload = json!({
            "currency": "USD",
            "total_amount": "100.00",
            "payout_amount": "33.33",
            "frequency": "weekly",
            "installment_count": 3,
            "start_date": "2026-01-15",
            "end_date": "2026-01-29",
            "final_installment_amount": "33.34",
            "schedule": [
                { "seq": 1, "due_on": "2026-01-15", "amount": "33.33", "disbursed": false },
                { "seq": 2, "due_on": "2026-01-22", "amount": "33.33", "disbursed": false },
                { "seq": 3, "due_on": "2026-01-29", "amount": "33.34", "disbursed": false },
            ],
        });

        let rendered = render_preview(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("3 installments of 33.33 USD."));
            assert!(text.contains("Final installment:"));
            assert!(text.contains("Nothing is saved yet."));
        }
    }

    #[test]
    fn options_for_custom_explain_the_date_driven_count() {
        let payload = json!({
            "frequency": "custom",
            "options": [],
        });

        let rendered = render_options(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No duration presets for `custom`."));
            assert!(text.contains("--date"));
        }
    }

    #[test]
    fn empty_expiring_output_names_the_window() {
        let payload = json!({
            "as_of": "2026-02-01",
            "within_days": 7,
            "rows": [],
        });

        let rendered = render_expiring(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No plans are expiring within 7 days."));
        }
    }
}
