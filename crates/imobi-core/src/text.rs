//! Accent and case folding for header matching and content comparison.
//!
//! Vendor spreadsheets spell the same header many ways (`ÁREA PRIVATIVA`,
//! `Area privativa (m²)`, `area_privativa`). Both folds decompose to NFD and
//! drop every non-ASCII code point, which removes combining accents and leaves
//! the base letters.
use unicode_normalization::UnicodeNormalization as _;

/// Folds `s` into an identifier-like key: ASCII, lowercase, alphanumerics only.
///
/// `"ÁREA PRIVATIVA (m²)"` becomes `"areaprivativam"`.
pub fn normalize_for_match(s: &str) -> String {
    s.nfd()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Folds `s` for content comparison: ASCII, uppercase, trimmed.
///
/// Spacing and punctuation are preserved so that `"2 Q - SUÍTE (PCD)"`
/// becomes `"2 Q - SUITE (PCD)"`.
pub fn normalize_display(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    folded.trim().to_owned()
}

/// Returns the first run of ASCII digits in `s` as an integer.
///
/// Used for block, stage and unit numbering: `"BLOCO 03"` → `Some(3)`,
/// `"QD-12A"` → `Some(12)`, `"TORRE A"` → `None`.
pub fn first_integer(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Returns `true` when the cell holds no value: empty after trimming.
///
/// The `--` sentinel is deliberately not blank here; formatters decide when it
/// collapses into absence.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Returns `true` for the `--` placeholder vendors use for "not applicable".
pub fn is_placeholder(s: &str) -> bool {
    s.trim() == "--"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_form_strips_accents_case_and_punctuation() {
        assert_eq!(normalize_for_match("ÁREA PRIVATIVA (m²)"), "areaprivativam");
        assert_eq!(normalize_for_match("Fração Ideal"), "fracaoideal");
        assert_eq!(normalize_for_match("  GARAGEM  "), "garagem");
        assert_eq!(normalize_for_match("VALOR (1x)"), "valor1x");
    }

    #[test]
    fn display_form_keeps_spacing() {
        assert_eq!(
            normalize_display("  2 Q - suíte térreo (PCD) "),
            "2 Q - SUITE TERREO (PCD)"
        );
    }

    #[test]
    fn first_integer_finds_leading_run() {
        assert_eq!(first_integer("BLOCO 03"), Some(3));
        assert_eq!(first_integer("QD-12A"), Some(12));
        assert_eq!(first_integer("ETAPA 1 - FASE 2"), Some(1));
        assert_eq!(first_integer("TORRE A"), None);
    }

    #[test]
    fn placeholder_is_not_blank() {
        assert!(is_blank("   "));
        assert!(!is_blank("--"));
        assert!(is_placeholder(" -- "));
    }
}
