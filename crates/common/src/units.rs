//! Area unit conversion and phone display helpers shared by the API and the
//! admin console payloads.

/// Square meters per pyeong (1평 = 3.305785㎡).
pub const M2_PER_PY: f64 = 3.305785;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert square meters to pyeong, rounded to 2 decimal places.
pub fn m2_to_py(m2: Option<f64>) -> Option<f64> {
    m2.map(|v| round2(v / M2_PER_PY))
}

/// Convert pyeong to square meters, rounded to 2 decimal places.
pub fn py_to_m2(py: Option<f64>) -> Option<f64> {
    py.map(|v| round2(v * M2_PER_PY))
}

/// Hyphenate a Korean phone number for display (10~11 digits, with the
/// Seoul `02` two-digit area code special case). Anything outside those
/// shapes is returned unchanged; this is a formatter, not a validator.
pub fn format_phone_kr(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
        10 if digits.starts_with("02") => {
            format!("{}-{}-{}", &digits[..2], &digits[2..6], &digits[6..])
        }
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        9 if digits.starts_with("02") => {
            format!("{}-{}-{}", &digits[..2], &digits[2..5], &digits[5..])
        }
        _ => raw.to_string(),
    }
}
