use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_plan_create(data: &Value) -> io::Result<String> {
    let plan = data
        .get("plan")
        .ok_or_else(|| io::Error::other("plan create output requires a plan"))?;

    let mut lines = vec![
        value_str(data, "message").to_string(),
        String::new(),
        "Plan:".to_string(),
    ];
    lines.extend(format::key_value_rows(&plan_summary_entries(plan), 2));

    lines.push(String::new());
    lines.push("Schedule:".to_string());
    lines.extend(schedule_table(data.get("schedule")));

    if let Some(next_step) = data.get("next_step") {
        lines.push(String::new());
        lines.push("Next step:".to_string());
        lines.push(format!(
            "  {}: {}",
            value_str(next_step, "label"),
            value_str(next_step, "command")
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_plan_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("plan list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No plans yet.",
            "",
            "Create one with `paydrip plan create --total <amount> --frequency <frequency>",
            "--installments <count>` and it will show up here.",
        ]
        .join("\n"));
    }

    let mut lines = vec![plural_heading(rows.len(), "plan"), String::new()];

    let columns = [
        Column {
            name: "Plan",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Frequency",
            align: Align::Left,
        },
        Column {
            name: "Progress",
            align: Align::Left,
        },
        Column {
            name: "Next Due",
            align: Align::Left,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                value_str(row, "plan_id").to_string(),
                value_str(row, "status").to_string(),
                value_str(row, "frequency").to_string(),
                progress_cell(row),
                optional_str(row, "next_due_on"),
                amount_cell(row, "total_amount"),
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

pub fn render_plan_show(data: &Value) -> io::Result<String> {
    let plan = data
        .get("plan")
        .ok_or_else(|| io::Error::other("plan show output requires a plan"))?;
    let progress = data
        .get("progress")
        .ok_or_else(|| io::Error::other("plan show output requires progress"))?;

    let mut lines = vec!["Plan:".to_string()];
    lines.extend(format::key_value_rows(&plan_summary_entries(plan), 2));

    lines.push(String::new());
    lines.push("Progress:".to_string());
    let mut progress_entries = vec![
        (
            "Completed:",
            format!(
                "{} of {} ({}%)",
                value_display(plan, "completed_installments"),
                value_display(plan, "installment_count"),
                progress.get("progress_percent").and_then(Value::as_u64).unwrap_or(0)
            ),
        ),
        ("Disbursed:", amount_cell_from(progress, plan, "amount_disbursed")),
        ("Remaining:", amount_cell_from(progress, plan, "amount_remaining")),
    ];
    if let Some(next_due) = progress.get("next_due_on").and_then(Value::as_str) {
        progress_entries.push(("Next due:", next_due.to_string()));
    }
    if let Some(days) = progress.get("days_until_next").and_then(Value::as_i64) {
        progress_entries.push(("Days until next:", days.to_string()));
    }
    if progress.get("expiring_soon").and_then(Value::as_bool) == Some(true) {
        progress_entries.push(("Expiring soon:", "yes".to_string()));
    }
    lines.extend(format::key_value_rows(&progress_entries, 2));

    lines.push(String::new());
    lines.push("Schedule:".to_string());
    lines.extend(schedule_table(data.get("schedule")));

    Ok(lines.join("\n"))
}

pub fn render_transition(data: &Value) -> io::Result<String> {
    let mut lines = vec![value_str(data, "message").to_string(), String::new()];

    let mut entries = vec![
        ("Plan:", value_str(data, "plan_id").to_string()),
        (
            "Status:",
            format!(
                "{} -> {}",
                value_str(data, "previous_status"),
                value_str(data, "status")
            ),
        ),
    ];
    if let Some(next_payable) = data.get("next_payable_on").and_then(Value::as_str) {
        entries.push(("Next payable:", next_payable.to_string()));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    Ok(lines.join("\n"))
}

pub fn render_disburse(data: &Value) -> io::Result<String> {
    let mut lines = vec![
        format!(
            "Disbursed installment {} of {}.",
            value_display(data, "seq"),
            value_display(data, "installment_count")
        ),
        String::new(),
    ];

    let mut entries = vec![
        ("Plan:", value_str(data, "plan_id").to_string()),
        ("Amount:", amount_cell(data, "amount")),
        ("Due date:", value_str(data, "due_on").to_string()),
        ("Status:", value_str(data, "status").to_string()),
    ];
    if let Some(next_due) = data.get("next_due_on").and_then(Value::as_str) {
        entries.push(("Next due:", next_due.to_string()));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    if data.get("plan_completed").and_then(Value::as_bool) == Some(true) {
        lines.push(String::new());
        lines.push("Every installment is disbursed. The plan is complete.".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn schedule_table(schedule: Option<&Value>) -> Vec<String> {
    let rows = schedule
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let columns = [
        Column {
            name: "#",
            align: Align::Right,
        },
        Column {
            name: "Due",
            align: Align::Left,
        },
        Column {
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Paid",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|entry| {
            vec![
                entry
                    .get("seq")
                    .and_then(Value::as_u64)
                    .map(|seq| seq.to_string())
                    .unwrap_or_default(),
                value_str(entry, "due_on").to_string(),
                value_str(entry, "amount").to_string(),
                if entry.get("disbursed").and_then(Value::as_bool) == Some(true) {
                    "yes".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table_or_blocks(&columns, &table_rows, format::terminal_width(), "Installment")
}

fn plan_summary_entries(plan: &Value) -> Vec<(&'static str, String)> {
    let mut entries = vec![
        ("Plan id:", value_str(plan, "plan_id").to_string()),
        ("Status:", value_str(plan, "status").to_string()),
        ("Total:", amount_cell(plan, "total_amount")),
        ("Payout:", amount_cell(plan, "payout_amount")),
        ("Frequency:", value_str(plan, "frequency").to_string()),
        (
            "Installments:",
            value_display(plan, "installment_count"),
        ),
    ];
    if let Some(start) = plan.get("start_date").and_then(Value::as_str) {
        entries.push(("Starts:", start.to_string()));
    }
    if plan.get("emergency_withdrawal").and_then(Value::as_bool) == Some(true) {
        entries.push(("Emergency withdrawal:", "enabled".to_string()));
    }
    entries
}

fn progress_cell(row: &Value) -> String {
    format!(
        "{}/{} ({}%)",
        value_display(row, "completed_installments"),
        value_display(row, "installment_count"),
        row.get("progress_percent").and_then(Value::as_u64).unwrap_or(0)
    )
}

fn amount_cell(row: &Value, key: &str) -> String {
    let amount = value_str(row, key);
    let currency = row.get("currency").and_then(Value::as_str).unwrap_or("USD");
    format!("{amount} {currency}")
}

fn amount_cell_from(progress: &Value, plan: &Value, key: &str) -> String {
    let amount = value_str(progress, key);
    let currency = plan.get("currency").and_then(Value::as_str).unwrap_or("USD");
    format!("{amount} {currency}")
}

fn plural_heading(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}.")
    } else {
        format!("{count} {noun}s.")
    }
}

fn optional_str(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

pub(super) fn value_str<'a>(value: &'a Value, key: &str) -> &'a str {
    match value.get(key) {
        Some(Value::String(inner)) => inner.as_str(),
        Some(Value::Null) | None => "",
        Some(other) => other.as_str().unwrap_or(""),
    }
}

/// Like `value_str`, but renders numbers too.
pub(super) fn value_display(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(inner)) => inner.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_disburse, render_plan_create, render_plan_list, render_transition};

    #[test]
    fn empty_plan_lists_use_a_plaintext_no_data_message() {
        let rendered = render_plan_list(&json!({ "rows": [] }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No plans yet."));
        }
    }

    #[test]
    fn plan_create_shows_message_schedule_and_next_step() {
        let payload = json!({
            "message": "Plan created in draft status.",
            "plan": {
                "plan_id": "plan_1",
                "status": "draft",
                "currency": "USD",
                "total_amount": "1200.00",
                "payout_amount": "100.00",
                "frequency": "monthly",
                "installment_count": 12,
                "completed_installments": 0,
                "start_date": "2026-02-01",
                "progress_percent": 0,
                "emergency_withdrawal": false,
            },
            "schedule": [
                { "seq": 1, "due_on": "2026-02-01", "amount": "100.00", "disbursed": false },
            ],
            "next_step": {
                "label": "Activate the plan",
                "command": "paydrip plan activate plan_1",
            },
        });

        let rendered = render_plan_create(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Plan created in draft status."));
            assert!(text.contains("Plan id:"));
            assert!(text.contains("2026-02-01"));
            assert!(text.contains("paydrip plan activate plan_1"));
        }
    }

    #[test]
    fn transition_output_shows_the_status_change() {
        let payload = json!({
            "plan_id": "plan_1",
            "previous_status": "paused",
            "status": "active",
            "message": "Plan resumed. Remaining installments stay on their original dates.",
            "next_payable_on": "2026-04-01",
        });

        let rendered = render_transition(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("paused -> active"));
            assert!(text.contains("Next payable:"));
        }
    }

    #[test]
    fn completed_disbursement_announces_completion() {
        let payload = json!({
            "plan_id": "plan_1",
            "seq": 4,
            "due_on": "2026-05-01",
            "amount": "100.00",
            "currency": "USD",
            "completed_installments": 4,
            "installment_count": 4,
            "status": "completed",
            "plan_completed": true,
        });

        let rendered = render_disburse(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Disbursed installment 4 of 4."));
            assert!(text.contains("The plan is complete."));
        }
    }
}
