//! Formatting of monetary amounts for display.
//!
//! Amounts are shown with two decimal places, a comma as the decimal
//! separator and a period between groups of thousands, e.g. `1234.5` is
//! displayed as "1.234,50".

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// The currency marker placed in front of balance amounts.
pub const CURRENCY_PREFIX: &str = "R$ ";

/// Format `value` with exactly two decimal places and grouped thousands.
///
/// Ties round away from zero, so `0.125` is displayed as "0,13". Negative
/// values get a leading minus sign, unless they round to zero.
pub fn format_value(value: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        // A period thousands separator switches the decimal mark to a comma.
        Formatter::new()
            .separator('.')
            .expect("a period is a valid thousands separator")
            .precision(Precision::Decimals(2))
    });

    let rounded = (value.abs() * 100.0).round() / 100.0;

    if rounded == 0.0 {
        // Zero is hardcoded as "0".
        return "0,00".to_owned();
    }

    let mut formatted = fmt.fmt_string(rounded);

    // numfmt omits trailing zeros, e.g. "12,30" is rendered as "12,3".
    match formatted.rsplit_once(',').map(|(_, fraction)| fraction.len()) {
        Some(decimals) => {
            for _ in decimals..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(",00"),
    }

    if value < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Format `value` like [format_value] and prefix it with [CURRENCY_PREFIX].
pub fn format_currency(value: f64) -> String {
    format!("{CURRENCY_PREFIX}{}", format_value(value))
}
