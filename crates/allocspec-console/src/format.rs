use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;

use crate::{elapsed_secs, EventVisitor};

pub(crate) fn format_event(v: &EventVisitor) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "solve_failed" => format_solve_failed(v),
        "change_applied" => format_change_applied(v),
        "change_noop" => format_change_noop(v),
        "constraint_rejected" => format_constraint_rejected(v),
        "constraint_cascade" => format_cascade(v),
        "invariant_violation" => format_invariant_violation(v),
        "bounded_unknown" => format_backend_unknown(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} Solving v{} │ {} vars │ {} constraints",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.version),
        count(v.vars).bright_yellow(),
        count(v.constraints).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let result = v.result.as_deref().unwrap_or("N/A");
    let (status, detail) = if result == "SAT" {
        (
            result.bright_green().bold().to_string(),
            format!("{} assigned", count(v.assigned)),
        )
    } else {
        (
            result.bright_red().bold().to_string(),
            format!("core of {}", count(v.core_size)),
        )
    };

    format!(
        "{} {} Solving complete │ {} │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status,
        detail,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_solve_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} Solve failed │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.error.as_deref().unwrap_or("unknown error").bright_red(),
    )
}

fn format_change_applied(v: &EventVisitor) -> String {
    format!(
        "{} {} {} → v{} │ {} vars │ {} constraints",
        format_elapsed(),
        "+".bright_green(),
        v.kind.as_deref().unwrap_or("change").white().bold(),
        count(v.version),
        count(v.vars),
        count(v.constraints),
    )
}

fn format_change_noop(v: &EventVisitor) -> String {
    format!(
        "{} {} {} left v{} unchanged",
        format_elapsed(),
        "·".bright_black(),
        v.kind.as_deref().unwrap_or("change").bright_black(),
        count(v.version),
    )
}

fn format_constraint_rejected(v: &EventVisitor) -> String {
    format!(
        "{} {} {} rejected │ undeclared {}",
        format_elapsed(),
        "!".yellow().bold(),
        v.constraint.as_deref().unwrap_or("?").white().bold(),
        v.var.as_deref().unwrap_or("?").yellow(),
    )
}

fn format_cascade(v: &EventVisitor) -> String {
    format!(
        "{} {} cascade │ {} vars │ {} constraints removed",
        format_elapsed(),
        "-".bright_red(),
        count(v.vars),
        count(v.removed).bright_red(),
    )
}

fn format_invariant_violation(v: &EventVisitor) -> String {
    format!(
        "{} {} invariant violated by event {} at v{} │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        count(v.event_id),
        count(v.version),
        v.violation.as_deref().unwrap_or("?").bright_red(),
    )
}

fn format_backend_unknown(v: &EventVisitor) -> String {
    format!(
        "{} {} backend undecided │ {}",
        format_elapsed(),
        "?".yellow().bold(),
        v.reason.as_deref().unwrap_or("?"),
    )
}

pub(crate) fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
