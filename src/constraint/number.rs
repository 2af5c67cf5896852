//! Numeric parsing and formatting for environment values.
//!
//! Environment values are checked with the lenient rules of JavaScript's
//! `Number()` conversion so that `.env` files shared with Node tooling validate
//! identically: surrounding whitespace is ignored, an empty string is zero,
//! `Infinity` and radix prefixes are accepted.

/// Parse an environment value as a number.
///
/// Returns `None` for anything `Number()` would turn into `NaN`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();

    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if let Some(value) = parse_radix(s) {
        return value;
    }

    // Rust also accepts "inf" and "nan" spellings, which are not numbers here
    let valid_chars = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !valid_chars {
        return None;
    }

    s.parse::<f64>().ok()
}

/// Handle `0x`, `0o` and `0b` literals. Signs are not allowed with a prefix.
///
/// Outer `None` means the input has no radix prefix.
fn parse_radix(s: &str) -> Option<Option<f64>> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(None);
    }

    let mut value = 0f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(None),
        }
    }
    Some(Some(value))
}

/// Format a number the way it appears in messages and injected defaults.
///
/// Follows JavaScript's `String(n)`: integral values print without a
/// fractional part (`10`, not `10.0`), and magnitudes of `1e21` and above or
/// below `1e-6` switch to exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }

    value.to_string()
}
