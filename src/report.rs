use std::fmt::Write;

use crate::core::{BreakEven, Outcome, ProjectionReport};

/// Whole-dollar currency with thousands separators, e.g. `-$1,234`.
///
/// Worths the model cannot represent print as `overflow` or `undefined`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "undefined".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-overflow" } else { "overflow" }.to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0.0 && digits != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Compact axis label, e.g. `$2.1M`, `$450K`.
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}${:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}${abs_value:.0}")
    }
}

fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Reached(estimate) => match estimate.date {
            Some(date) => format!("{:.2} / {date}", estimate.age),
            None => format!("{:.2}", estimate.age),
        },
        Outcome::Never => "never".to_string(),
    }
}

/// Plain-text summary printed after a run.
pub fn format_report(report: &ProjectionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Est worth at retirement: {}",
        format_currency(report.worth_at_retirement)
    );
    if let Some(target) = &report.target_date {
        let _ = writeln!(
            out,
            "Est worth on {}: {}",
            target.date,
            format_currency(target.worth)
        );
    }
    out.push('\n');

    match report.break_even_worth {
        BreakEven::Defined { worth } => {
            let _ = writeln!(out, "Break-even amount: {}", format_currency(worth));
        }
        BreakEven::Undefined => {
            out.push_str("Break-even amount: undefined (retired return must be positive)\n");
        }
    }
    let _ = writeln!(
        out,
        "Est break-even age: {}",
        format_outcome(&report.break_even_age)
    );

    if let Some(target) = &report.target_worth {
        let _ = writeln!(
            out,
            "Est age at {}: {}",
            format_currency(target.worth),
            format_outcome(&target.reached)
        );
    }

    out
}
