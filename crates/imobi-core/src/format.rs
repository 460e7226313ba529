//! Field formatters: raw record cells to output strings.
//!
//! Every numeric decision goes through [`crate::number::parse_number`], so a
//! descriptor such as `02 VAGAS` is never silently turned into `2`.
use crate::concept::ColumnConcept;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::number::{Number, format_area, format_currency_brl, parse_lot_area, parse_number};
use crate::record::Record;
use crate::text::{first_integer, is_blank, normalize_display};

/// Output for an absent area.
pub const NO_AREA: &str = "--";

/// Suffix appended to accessibility-tagged units.
pub const PCD_SUFFIX: &str = " (PCD)";

/// Integer-looking garage values below this are space counts; see
/// [`garage_label`].
const MAX_GARAGE_COUNT: f64 = 10.0;

/// Formats the unit name of `record`: `BL01 - APT 02`, `QD03 - LOTE 05`.
///
/// Block and unit numbers are zero-padded to two digits. A block or unit
/// without an embedded integer is used as written, display-normalized.
/// ` (PCD)` is appended when `PCD` appears in the TYPE or UNIT cell.
pub fn unit_name(record: &Record) -> String {
    let mut name = format!("{} - {}", block_code(record), unit_code(record));
    if is_pcd(record) {
        name.push_str(PCD_SUFFIX);
    }
    name
}

/// Block half of a unit name: `BL01`, `QD03`.
pub fn block_code(record: &Record) -> String {
    match record.block.numeric {
        Some(n) => format!("{}{n:02}", record.block.prefix.as_str()),
        None => normalize_display(&record.block.original),
    }
}

/// Unit half of a unit name, without the PCD suffix: `APT 02`, `LOTE 05`.
pub fn unit_code(record: &Record) -> String {
    let raw = record.get(ColumnConcept::Unit);
    match first_integer(raw) {
        Some(n) => format!("{} {n:02}", record.unit_prefix.as_str()),
        None => normalize_display(raw),
    }
}

/// Returns `true` when the TYPE or UNIT cell mentions `PCD`.
pub fn is_pcd(record: &Record) -> bool {
    [ColumnConcept::Type, ColumnConcept::Unit]
        .into_iter()
        .any(|c| normalize_display(record.get(c)).contains("PCD"))
}

/// Formats a garage cell as a parking-space count.
///
/// Integer-looking numbers below 10 are counts; any other number is an area
/// in m² and is banded. Text other than `none` passes through unchanged.
pub fn garage_label(raw: &str) -> String {
    if is_blank(raw) || raw.trim().eq_ignore_ascii_case("none") {
        return "01 VAGA".to_owned();
    }
    let Some(n) = parse_number(raw) else {
        return raw.trim().to_owned();
    };
    let spaces = if n.is_integer_like() && n.value < MAX_GARAGE_COUNT {
        match n.value {
            v if v >= 4.0 => 4,
            v if v >= 3.0 => 3,
            v if v >= 2.0 => 2,
            _ => 1,
        }
    } else {
        match n.value {
            v if v > 35.0 => 4,
            v if v > 25.0 => 3,
            v if v > 15.0 => 2,
            _ => 1,
        }
    };
    if spaces == 1 {
        "01 VAGA".to_owned()
    } else {
        format!("{spaces:02} VAGAS")
    }
}

/// How an area cell is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaRule {
    /// Plain locale-tolerant parsing.
    Plain,
    /// Lot layouts: implausibly small `1.250`-style values are thousands.
    Lot,
}

/// Parses an area cell under `rule`. Zero and non-numeric cells are absent.
///
/// A lot area that was re-read as thousands is reported on `diagnostics`.
pub fn parse_area(
    raw: &str,
    rule: AreaRule,
    row: usize,
    diagnostics: &mut Diagnostics,
) -> Option<f64> {
    let parsed = match rule {
        AreaRule::Plain => parse_number(raw),
        AreaRule::Lot => {
            let lot = parse_lot_area(raw);
            if let (Some(lot), Some(plain)) = (lot, parse_number(raw)) {
                if lot.value != plain.value {
                    diagnostics.info(
                        DiagnosticCode::LotAreaReinterpreted,
                        Some(row),
                        format!("lot area {:?} read as {}", raw.trim(), format_area(lot.value)),
                    );
                }
            }
            lot
        }
    };
    parsed.map(|n| n.value).filter(|v| *v != 0.0)
}

/// Formats an area: `1234,56 m²`, or `--` when absent.
pub fn area_label(area: Option<f64>) -> String {
    area.map_or_else(|| NO_AREA.to_owned(), format_area)
}

/// Parses a currency cell.
pub fn parse_currency(raw: &str) -> Option<f64> {
    parse_number(raw).map(|Number { value, .. }| value)
}

/// Formats a currency cell: `R$ 1.234,56`, or empty when non-numeric.
pub fn currency_label(raw: &str) -> String {
    parse_currency(raw).map_or_else(String::new, format_currency_brl)
}

/// Parses `raw` as a number, recording a [`DiagnosticCode::NotNumeric`]
/// warning when a non-blank cell does not parse.
pub fn numeric_or_warn(
    raw: &str,
    concept: ColumnConcept,
    row: usize,
    diagnostics: &mut Diagnostics,
) -> Option<f64> {
    let parsed = parse_currency(raw);
    if parsed.is_none() && !is_blank(raw) {
        diagnostics.warn(
            DiagnosticCode::NotNumeric,
            Some(row),
            format!("{concept} value {:?} is not numeric", raw.trim()),
        );
    }
    parsed
}

/// Trims free text for output.
pub fn text_label(raw: &str) -> String {
    raw.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::record::{BlockKey, BlockPrefix, UnitPrefix};

    fn record(block: &str, prefix: BlockPrefix, unit_prefix: UnitPrefix, cells: &[(ColumnConcept, &str)]) -> Record {
        let fields: BTreeMap<ColumnConcept, String> =
            cells.iter().map(|(c, v)| (*c, (*v).to_owned())).collect();
        Record::new(0, "ETAPA 01".to_owned(), BlockKey::new(block, prefix), unit_prefix, fields)
    }

    #[test]
    fn unit_names_are_zero_padded() {
        let r = record("BLOCO 1", BlockPrefix::Bl, UnitPrefix::Apt, &[(ColumnConcept::Unit, "2")]);
        assert_eq!(unit_name(&r), "BL01 - APT 02");
        let r = record("03", BlockPrefix::Qd, UnitPrefix::Lote, &[(ColumnConcept::Unit, "Lote 5")]);
        assert_eq!(unit_name(&r), "QD03 - LOTE 05");
        let r = record("BLOCO 2", BlockPrefix::Bl, UnitPrefix::Apt, &[(ColumnConcept::Unit, "101")]);
        assert_eq!(unit_name(&r), "BL02 - APT 101");
    }

    #[test]
    fn name_halves() {
        let r = record("QUADRA 7", BlockPrefix::Qd, UnitPrefix::Lote, &[(ColumnConcept::Unit, "12")]);
        assert_eq!(block_code(&r), "QD07");
        assert_eq!(unit_code(&r), "LOTE 12");
    }

    #[test]
    fn names_without_integers_are_kept() {
        let r = record("Torre Ávila", BlockPrefix::Bl, UnitPrefix::Casa, &[(ColumnConcept::Unit, "Cobertura")]);
        assert_eq!(unit_name(&r), "TORRE AVILA - COBERTURA");
    }

    #[test]
    fn pcd_from_type_or_unit() {
        let r = record(
            "BLOCO 01",
            BlockPrefix::Bl,
            UnitPrefix::Apt,
            &[
                (ColumnConcept::Unit, "1"),
                (ColumnConcept::Type, "2 Q - SUÍTE TÉRREO (PCD)"),
            ],
        );
        assert_eq!(unit_name(&r), "BL01 - APT 01 (PCD)");
        let r = record("BLOCO 01", BlockPrefix::Bl, UnitPrefix::Apt, &[(ColumnConcept::Unit, "3 pcd")]);
        assert!(unit_name(&r).ends_with(PCD_SUFFIX));
    }

    #[test]
    fn garage_counts_and_bands() {
        assert_eq!(garage_label(""), "01 VAGA");
        assert_eq!(garage_label("None"), "01 VAGA");
        assert_eq!(garage_label("1"), "01 VAGA");
        assert_eq!(garage_label("2"), "02 VAGAS");
        assert_eq!(garage_label("3"), "03 VAGAS");
        assert_eq!(garage_label("7"), "04 VAGAS");
        assert_eq!(garage_label("27"), "03 VAGAS");
        assert_eq!(garage_label("12,5"), "01 VAGA");
        assert_eq!(garage_label("2,0"), "01 VAGA");
        assert_eq!(garage_label("36"), "04 VAGAS");
        assert_eq!(garage_label("16"), "02 VAGAS");
        assert_eq!(garage_label("02 VAGAS"), "02 VAGAS");
        assert_eq!(garage_label("--"), "--");
    }

    #[test]
    fn garage_count_threshold_boundary() {
        assert_eq!(garage_label("9"), "04 VAGAS");
        assert_eq!(garage_label("10"), "01 VAGA");
    }

    #[test]
    fn areas() {
        let mut d = Diagnostics::new();
        let a = parse_area("1.234,56", AreaRule::Plain, 0, &mut d);
        assert_eq!(area_label(a), "1234,56 m²");
        let a = parse_area("1,234.56", AreaRule::Plain, 0, &mut d);
        assert_eq!(area_label(a), "1234,56 m²");
        assert_eq!(area_label(parse_area("0", AreaRule::Plain, 0, &mut d)), NO_AREA);
        assert_eq!(area_label(parse_area("--", AreaRule::Plain, 0, &mut d)), NO_AREA);
        assert_eq!(area_label(parse_area("", AreaRule::Plain, 0, &mut d)), NO_AREA);
        assert!(d.is_empty());
    }

    #[test]
    fn lot_area_reinterpretation_is_reported() {
        let mut d = Diagnostics::new();
        let a = parse_area("1.250", AreaRule::Lot, 4, &mut d);
        assert_eq!(area_label(a), "1250,00 m²");
        assert!(d.has(DiagnosticCode::LotAreaReinterpreted));
        assert_eq!(d.entries()[0].row, Some(5));
    }

    #[test]
    fn currency() {
        assert_eq!(currency_label("123456.78"), "R$ 123.456,78");
        assert_eq!(currency_label("R$ 100.000,00"), "R$ 100.000,00");
        assert_eq!(currency_label("sob consulta"), "");
    }

    #[test]
    fn non_numeric_value_warns_once() {
        let mut d = Diagnostics::new();
        assert_eq!(numeric_or_warn("abc", ColumnConcept::Value, 1, &mut d), None);
        assert_eq!(numeric_or_warn("", ColumnConcept::Value, 2, &mut d), None);
        assert_eq!(d.warning_count(), 1);
    }
}
