//! Number and duration formatting for rendered fields.
//!
//! Rounding follows browser semantics: halves round towards positive
//! infinity, so `-2.5` becomes `-2`.

/// Units above seconds, with the factor needed to reach them
const AGE_SCALES: [(f64, char); 3] = [(60.0, 'm'), (60.0, 'h'), (24.0, 'd')];

pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    // `f64::round` sends negative halves away from zero
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Round to a precision given as a power-of-ten scale (`10.0` keeps one decimal)
pub fn round_to(value: f64, scale: f64) -> f64 {
    round_half_up(value * scale) / scale
}

/// Shortest display form of a number. Never renders `-0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Render an elapsed duration as `{n}s`, `{n}m`, `{n}h` or `{n}d`.
///
/// A unit is only promoted once the amount strictly exceeds the next scale,
/// so exactly 60 seconds still reads `60s`.
pub fn format_age(elapsed_secs: f64) -> String {
    let mut amount = elapsed_secs;
    let mut unit = 's';

    for (factor, next_unit) in AGE_SCALES {
        if amount <= factor {
            break;
        }
        amount /= factor;
        unit = next_unit;
    }

    format!("{}{}", format_number(round_half_up(amount)), unit)
}
