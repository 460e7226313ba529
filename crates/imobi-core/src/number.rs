//! Locale-tolerant number parsing and Brazilian-style formatting.
//!
//! Vendor sheets mix `1.234,56` (pt-BR) and `1,234.56` (en-US), prefix
//! currency with `R$` and suffix areas with `m²`. [`parse_number`] is the one
//! place that decides how such a string becomes a float; every formatter in
//! the pipeline goes through it.
//!
//! Separator rule: the rightmost of `.` / `,` is the decimal separator unless
//! it occurs more than once, in which case it is a thousands separator and
//! the value has no fractional part. The other separator is always thousands.
use std::sync::LazyLock;

use regex::Regex;

/// Digit runs joined by single separators, or a bare fraction (`.5`).
///
/// The pattern is a literal; `None` is unreachable in practice and makes every
/// cell non-numeric rather than panicking.
static NUMERIC_SHAPE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:\d+(?:[.,]\d+)*|[.,]\d+)$").ok());

/// The result of parsing a raw cell as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    /// Parsed value.
    pub value: f64,
    /// `true` when the source carried a decimal separator (`"2,5"`, `"27.0"`),
    /// `false` for integer-looking input (`"27"`, `"1.234.567"`).
    pub fractional: bool,
}

impl Number {
    /// Returns `true` for integer-looking input.
    pub fn is_integer_like(&self) -> bool {
        !self.fractional
    }
}

/// Lots below this size are implausible; see [`parse_lot_area`].
const MIN_PLAUSIBLE_LOT_AREA: f64 = 10.0;

/// Parses `s` as a number, tolerating currency and area markers.
///
/// Returns `None` when the string is empty, contains any letter after the
/// markers are removed (`"02 VAGAS"`), or is not numerically shaped.
pub fn parse_number(s: &str) -> Option<Number> {
    let body = strip_markers(s);
    if body.chars().any(char::is_alphabetic) {
        return None;
    }
    let residue: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let (negative, digits) = match residue.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, residue.as_str()),
    };
    let shaped = NUMERIC_SHAPE_RE
        .as_ref()
        .is_some_and(|re| re.is_match(digits));
    if !shaped {
        return None;
    }

    let (canonical, fractional) = canonicalize_separators(digits)?;
    let magnitude: f64 = canonical.parse().ok()?;
    if !magnitude.is_finite() {
        return None;
    }
    Some(Number {
        value: if negative { -magnitude } else { magnitude },
        fractional,
    })
}

/// Parses a lot area, re-reading implausibly small values as thousands.
///
/// `"1.250"` parses as `1.25` under the separator rule, but no lot measures
/// 1.25 m². When the input has a single separator followed by exactly three
/// digits and the parsed value is below 10, the separator is taken as a
/// thousands separator instead (`1250`).
pub fn parse_lot_area(s: &str) -> Option<Number> {
    let parsed = parse_number(s)?;
    if !parsed.fractional || parsed.value.abs() >= MIN_PLAUSIBLE_LOT_AREA {
        return Some(parsed);
    }
    let body = strip_markers(s);
    let separators: Vec<usize> = body
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | ','))
        .map(|(i, _)| i)
        .collect();
    let [only] = separators.as_slice() else {
        return Some(parsed);
    };
    let tail = &body[only + 1..];
    if tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit()) {
        return Some(Number {
            value: parsed.value * 1000.0,
            fractional: false,
        });
    }
    Some(parsed)
}

/// Removes surrounding whitespace, a leading currency marker and a trailing
/// area marker.
fn strip_markers(s: &str) -> &str {
    let mut body = s.trim();
    for marker in ["R$", "$"] {
        if let Some(rest) = strip_prefix_ci(body, marker) {
            body = rest.trim_start();
            break;
        }
    }
    for marker in ["m²", "m2"] {
        if let Some(rest) = strip_suffix_ci(body, marker) {
            body = rest.trim_end();
            break;
        }
    }
    body
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    let tail = s.get(cut..)?;
    (tail.to_lowercase() == suffix.to_lowercase()).then(|| &s[..cut])
}

/// Rewrites `digits` (digits plus `.`/`,` only) into a Rust float literal.
fn canonicalize_separators(digits: &str) -> Option<(String, bool)> {
    let Some(last) = digits.rfind(['.', ',']) else {
        return Some((digits.to_owned(), false));
    };
    let decimal = if digits[last..].starts_with('.') {
        '.'
    } else {
        ','
    };
    let other = if decimal == '.' { ',' } else { '.' };

    if digits.matches(decimal).count() > 1 {
        // Repeated rightmost separator: grouping only, no fraction.
        if digits.contains(other) {
            return None;
        }
        return Some((digits.replace(decimal, ""), false));
    }

    let canonical: String = digits
        .chars()
        .filter(|&c| c != other)
        .map(|c| if c == decimal { '.' } else { c })
        .collect();
    Some((canonical, true))
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Formats `x` as Brazilian currency: `R$ 1.234,56`, `R$ -1.234,56`.
///
/// Non-finite input yields an empty string.
pub fn format_currency_brl(x: f64) -> String {
    if !x.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.2}", x.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), "00"),
    };
    let is_zero = int_part.chars().chain(frac_part.chars()).all(|c| c == '0');
    let sign = if x < 0.0 && !is_zero { "-" } else { "" };
    format!("R$ {sign}{},{frac_part}", group_thousands(int_part, '.'))
}

/// Formats an area with two decimals, comma decimal and no grouping:
/// `1234,56 m²`.
pub fn format_area(x: f64) -> String {
    format!("{} m²", format_decimal_comma(x, 2))
}

/// Formats a fractional share with fixed precision (clamped to 5..=9).
pub fn format_fraction(x: f64, precision: usize) -> String {
    format_decimal_comma(x, precision.clamp(5, 9))
}

/// Formats `x` with `precision` decimals and a comma decimal separator.
pub fn format_decimal_comma(x: f64, precision: usize) -> String {
    format!("{x:.precision$}").replace('.', ",")
}

/// Inserts `sep` every three digits from the right.
fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn value(s: &str) -> f64 {
        parse_number(s).expect("numeric").value
    }

    #[test]
    fn brazilian_and_us_separators() {
        assert_eq!(value("1.234,56"), 1234.56);
        assert_eq!(value("1,234.56"), 1234.56);
        assert_eq!(value("123456.78"), 123_456.78);
        assert_eq!(value("2,5"), 2.5);
    }

    #[test]
    fn repeated_separator_is_grouping() {
        let n = parse_number("1.234.567").expect("numeric");
        assert_eq!(n.value, 1_234_567.0);
        assert!(n.is_integer_like());
        assert!(parse_number("1,234.567.890").is_none());
    }

    #[test]
    fn markers_are_stripped() {
        assert_eq!(value("R$ 100.000,00"), 100_000.0);
        assert_eq!(value("r$1.500,00"), 1500.0);
        assert_eq!(value("45,20 m²"), 45.2);
        assert_eq!(value("45.20M2"), 45.2);
        assert_eq!(value("R$ -1.234,56"), -1234.56);
    }

    #[test]
    fn letters_are_rejected() {
        assert!(parse_number("02 VAGAS").is_none());
        assert!(parse_number("none").is_none());
        assert!(parse_number("").is_none());
        assert!(parse_number("--").is_none());
        assert!(parse_number("10-20").is_none());
    }

    #[test]
    fn integer_like_versus_fractional() {
        assert!(parse_number("27").expect("numeric").is_integer_like());
        assert!(!parse_number("27,0").expect("numeric").is_integer_like());
    }

    #[test]
    fn lot_area_reads_short_thousands() {
        let n = parse_lot_area("1.250").expect("numeric");
        assert_eq!(n.value, 1250.0);
        assert_eq!(parse_lot_area("250,50").expect("numeric").value, 250.5);
        assert_eq!(parse_lot_area("1,5").expect("numeric").value, 1.5);
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency_brl(123_456.78), "R$ 123.456,78");
        assert_eq!(format_currency_brl(1_500.0), "R$ 1.500,00");
        assert_eq!(format_currency_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_currency_brl(-1_234.56), "R$ -1.234,56");
        assert_eq!(format_currency_brl(-0.001), "R$ 0,00");
        assert_eq!(format_currency_brl(f64::NAN), "");
    }

    #[test]
    fn area_and_fraction_use_comma() {
        assert_eq!(format_area(1234.56), "1234,56 m²");
        assert_eq!(format_fraction(0.25, 9), "0,250000000");
        assert_eq!(format_fraction(0.25, 2), "0,25000");
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(1650.0 * 1.1), 1815.0);
        assert_eq!(round2(2.675_1), 2.68);
    }
}
