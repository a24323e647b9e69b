//! Plain text rendering: aligned tables, bar charts and forecast bands

use sales_forecast::{ForecastResult, Table};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if is_wide(c) { 2 } else { 1 })
        .sum()
}

// Hangul and CJK ideographs take two terminal columns
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60)
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    if right_align {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

fn looks_numeric(text: &str) -> bool {
    !text.is_empty() && text.replace(',', "").parse::<f64>().is_ok()
}

/// Render rows under a header with a separator line. Numeric cells are
/// right aligned.
pub fn table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h.as_ref())).collect();
    for row in rows {
        for (idx, cell) in row.iter().take(columns).enumerate() {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h.as_ref(), *w, false))
        .collect();
    let _ = writeln!(out, "{}", header_line.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for row in rows {
        let cells: Vec<String> = (0..columns)
            .map(|idx| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                pad(cell, widths[idx], looks_numeric(cell))
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Preview of a raw upload
pub fn raw_table(table: &Table) -> String {
    self::table(table.headers(), table.rows())
}

/// Horizontal bars scaled to the largest value
pub fn bar_chart(items: &[(String, f64)]) -> String {
    let max = items
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let label_width = items
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in items {
        let length = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{} | {} {}",
            pad(label, label_width, false),
            "█".repeat(length),
            format_number(*value)
        );
    }
    out
}

/// Shares as percentages with a proportional bar, the text stand-in for
/// a pie chart
pub fn share_chart(items: &[(String, f64)]) -> String {
    let label_width = items
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, share) in items {
        let length = (share * BAR_WIDTH as f64).round().max(0.0) as usize;
        let _ = writeln!(
            out,
            "{} {:>6.1}% {}",
            pad(label, label_width, false),
            share * 100.0,
            "▒".repeat(length)
        );
    }
    out
}

/// Forecast rows with the interval drawn as `[---*---]` on a shared scale
pub fn forecast_bands(forecast: &ForecastResult) -> String {
    let max = forecast
        .upper_bound
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    let scale = |value: f64| -> usize {
        if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        }
    };

    let mut out = String::new();
    for (date, lower, point, upper) in forecast.rows() {
        let (lo, mid, hi) = (scale(lower), scale(point), scale(upper));
        let mut line = vec![' '; BAR_WIDTH + 1];
        for cell in line.iter_mut().take(hi + 1).skip(lo) {
            *cell = '-';
        }
        line[lo] = '[';
        line[hi] = ']';
        line[mid] = '*';
        let _ = writeln!(out, "{} |{}", date, line.into_iter().collect::<String>().trim_end());
    }
    out
}

/// Two decimals, integers without a fraction
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        "-".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
