//! Human-readable byte sizes using decimal (SI) units
//!
//! Formatting and parsing share one unit table so that a formatted size parses
//! back to the same magnitude.

/// Units in ascending order with their decimal multipliers
const UNITS: [(&str, f64); 5] = [
    ("B", 1.0),
    ("KB", 1e3),
    ("MB", 1e6),
    ("GB", 1e9),
    ("TB", 1e12),
];

/// Format a byte count as e.g. `"1.5 MB"` or `"120 B"`
///
/// Values are rounded to one decimal place; a trailing `.0` is dropped.
pub fn bytes_to_human(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut unit_idx = UNITS.len() - 1;
    while unit_idx > 0 && (bytes as f64) < UNITS[unit_idx].1 {
        unit_idx -= 1;
    }

    let mut value = round_one_decimal(bytes as f64 / UNITS[unit_idx].1);
    // 999_999 rounds to "1000.0 KB"; promote to the next unit instead
    if value >= 1000.0 && unit_idx < UNITS.len() - 1 {
        unit_idx += 1;
        value = round_one_decimal(bytes as f64 / UNITS[unit_idx].1);
    }

    if value.fract() == 0.0 {
        format!("{:.0} {}", value, UNITS[unit_idx].0)
    } else {
        format!("{:.1} {}", value, UNITS[unit_idx].0)
    }
}

/// Parse a size produced by [`bytes_to_human`] back into bytes
///
/// Accepts `<number><optional spaces><unit>` with unit one of B, KB, MB, GB, TB.
/// Anything else yields 0.
pub fn parse_size(size: &str) -> u64 {
    let size = size.trim();
    let split = size
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(size.len());
    let (number, unit) = size.split_at(split);
    let unit = unit.trim_start();

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };

    match UNITS.iter().find(|(name, _)| *name == unit) {
        Some((_, multiplier)) => (value * multiplier).round() as u64,
        None => 0,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_are_bytes() {
        assert_eq!(bytes_to_human(0), "0 B");
        assert_eq!(bytes_to_human(999), "999 B");
    }

    #[test]
    fn test_decimal_units() {
        assert_eq!(bytes_to_human(1_000), "1 KB");
        assert_eq!(bytes_to_human(1_500_000), "1.5 MB");
        assert_eq!(bytes_to_human(2_000_000_000), "2 GB");
        assert_eq!(bytes_to_human(3_250_000_000_000), "3.3 TB");
    }

    #[test]
    fn test_rounding_promotes_unit() {
        assert_eq!(bytes_to_human(999_999), "1 MB");
    }

    #[test]
    fn test_parse_known_strings() {
        assert_eq!(parse_size("1.5 MB"), 1_500_000);
        assert_eq!(parse_size("2 GB"), 2_000_000_000);
        assert_eq!(parse_size("120 B"), 120);
        assert_eq!(parse_size("7KB"), 7_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_size(""), 0);
        assert_eq!(parse_size("lots"), 0);
        assert_eq!(parse_size("12 PB"), 0);
        assert_eq!(parse_size("1.2.3 MB"), 0);
    }

    #[test]
    fn test_formatted_size_parses_back() {
        for bytes in [1_500_000u64, 500_000_000, 1_000_000_000, 42, 7_300] {
            assert_eq!(parse_size(&bytes_to_human(bytes)), bytes);
        }
    }
}
