// Utility helpers for numeric coercion and console formatting.
//
// CSV exports from admin portals are messy: thousands separators, percent
// signs, stray spaces and trailing units all show up in numeric columns.
// Everything that reads a number out of a cell goes through `parse_number`
// so the rest of the pipeline can assume plain `f64` values.
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

/// Coerce a cell into a number, never failing.
///
/// - Removes commas, percent signs and any whitespace.
/// - Parses the longest leading floating-point literal, so `"12 hrs"`
///   becomes `12.0`.
/// - Empty, unparseable or non-finite input yields `0.0`.
pub fn parse_number(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && *c != '%' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    let Some(m) = LEADING_FLOAT.find(&cleaned) else {
        return 0.0;
    };
    match m.as_str().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Same as `parse_number` but for optional cells (unmapped column or
/// missing value).
pub fn parse_number_opt(s: Option<&str>) -> f64 {
    s.map(parse_number).unwrap_or(0.0)
}

/// Round half-up: `2.5 -> 3`, `-2.5 -> -2`.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Division that yields `0.0` instead of NaN/inf when the denominator is
/// zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let r = numerator / denominator;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators
    // (e.g. `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = match int_part.parse::<i64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => group_thousands(int_part),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

// Comma-groups a plain digit string that does not fit in an i64.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Dollar amount with no decimals, e.g. `$4,800`.
pub fn format_currency(n: f64) -> String {
    format!("${}", format_number(n, 0))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_percent() {
        assert_eq!(parse_number("1,234%"), 1234.0);
        assert_eq!(parse_number(" 12 345 "), 12345.0);
        assert_eq!(parse_number("45.5 %"), 45.5);
    }

    #[test]
    fn numeric_strings_are_unchanged() {
        for v in [0.0, 1.0, 15.0, 1234.5, 0.25, 1e6] {
            assert_eq!(parse_number(&v.to_string()), v);
        }
        assert_eq!(parse_number("-3.5"), -3.5);
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("Infinity"), 0.0);
        assert_eq!(parse_number("1e999"), 0.0);
        assert_eq!(parse_number_opt(None), 0.0);
    }

    #[test]
    fn takes_leading_numeric_prefix() {
        assert_eq!(parse_number("12hrs"), 12.0);
        assert_eq!(parse_number(".5x"), 0.5);
        assert_eq!(parse_number("3e2 actions"), 300.0);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 0.25);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(541.25, 0), "541");
        assert_eq!(format_number(-1500.0, 1), "-1,500.0");
        assert_eq!(format_currency(4800.0), "$4,800");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn formats_values_beyond_i64() {
        assert_eq!(format_number(1e20, 0), "100,000,000,000,000,000,000");
        assert_eq!(format_number(1e19, 1), "10,000,000,000,000,000,000.0");
    }
}
