//! Text formatting for figures shown to the user.
//!
//! Missing values become `N/A` here and nowhere else.

/// Placeholder for values the provider did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Compact number with a T/B/M/K suffix and no decimals, e.g. `383B`.
pub fn compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{:.0}T", value * 1e-12)
    } else if magnitude >= 1e9 {
        format!("{:.0}B", value * 1e-9)
    } else if magnitude >= 1e6 {
        format!("{:.0}M", value * 1e-6)
    } else if magnitude >= 1e3 {
        format!("{:.0}K", value * 1e-3)
    } else {
        format!("{}", value)
    }
}

/// Two decimals with thousands separators, e.g. `-1,234,567.89`.
pub fn grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Dollar amount, e.g. `$1,234.50`; `N/A` when missing.
pub fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${}", grouped(-v)),
        Some(v) => format!("${}", grouped(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Ratio rendered as a percentage with two decimals, e.g. `0.2431` → `24.31%`.
pub fn ratio_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Value already in percent, two decimals.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v))
}

/// Plain number with two decimals.
pub fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}", v))
}

/// Any displayable value, or `N/A`.
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
