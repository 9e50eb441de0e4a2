//! Number formatting for display values.

pub const CELSIUS: &str = "°C";
pub const PERCENT: &str = "%";

/// Integral values get no decimals, everything else exactly two.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Two decimals when `high_precision` is set, none otherwise.
pub fn format_number_precision(value: f64, high_precision: bool) -> String {
    if high_precision {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}
