//! Decimal text formatting for invariant values.

/// Formats a value as shortest round-trip single-precision decimal text.
///
/// The value is rounded to `f32` first, so the text carries at most nine
/// significant digits. Magnitudes in `[1e-3, 1e7)` (and zero) use plain
/// notation, everything else switches to scientific notation so tiny
/// high-order invariants stay short. Both forms parse back with
/// `str::parse::<f32>`.
pub(crate) fn format_value(value: f64) -> String {
    let value = value as f32;
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-3..1e7).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn plain_range_uses_plain_notation() {
        assert_eq!(format_value(0.16), "0.16");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-2.5), "-2.5");
    }

    #[test]
    fn tiny_values_use_scientific_notation() {
        assert_eq!(format_value(1.5e-30), "1.5e-30");
        assert_eq!(format_value(-4e-5), "-4e-5");
    }

    #[test]
    fn double_precision_digits_are_dropped() {
        assert_eq!(format_value(0.217283950617284), "0.21728395");
        assert_eq!(format_value(-2.6702880859375e-5), "-2.670288e-5");
    }

    #[test]
    fn formatted_values_round_trip_as_single_precision() {
        for value in [0.1234567890123, 3.3e-12, 9.99e8, -7.25e-4] {
            let text = format_value(value);
            assert_eq!(text.parse::<f32>().unwrap(), value as f32);
        }
    }
}
