//! Argentine number and date rendering

use chrono::{Datelike, NaiveDate};

/// Render an amount with `.` thousands grouping and `,` decimals,
/// at most three fraction digits, trailing zeros removed
pub fn format_amount(value: f64) -> String {
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac)
    }
}

/// Render a line amount with exactly two decimals and a `.` separator
pub fn format_line_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Render a date as `d/m/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}
