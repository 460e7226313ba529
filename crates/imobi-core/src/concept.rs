//! Column concepts: the fixed vocabulary the pipeline binds headers to.
//!
//! Each concept owns an ordered synonym list in match form (see
//! [`crate::text::normalize_for_match`]). Order matters: the resolver tries
//! exact matches keyword by keyword before it falls back to substrings.
use std::fmt;

use serde::Serialize;

/// A symbolic column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnConcept {
    /// Block, tower or quadra identifier.
    Block,
    /// Unit, apartment, house or lot number.
    Unit,
    /// Typology description (`2 Q - SUÍTE`).
    Type,
    /// Built area.
    AreaBuilt,
    /// Yard / backyard area.
    Yard,
    /// Parking spaces, as a count, an area or a description.
    Garage,
    /// Private area.
    PrivateArea,
    /// Ideal fraction of the enterprise.
    IdealFraction,
    /// Sale value.
    Value,
    /// Development stage.
    Stage,
    /// Down payment.
    Entry,
    /// Enterprise / project name (blocked-units reports).
    Project,
    /// Blocking reason (blocked-units reports).
    Reason,
    /// Blocking date (blocked-units reports).
    BlockedAt,
}

impl ColumnConcept {
    /// Every concept, in declaration order.
    pub const ALL: [ColumnConcept; 14] = [
        Self::Block,
        Self::Unit,
        Self::Type,
        Self::AreaBuilt,
        Self::Yard,
        Self::Garage,
        Self::PrivateArea,
        Self::IdealFraction,
        Self::Value,
        Self::Stage,
        Self::Entry,
        Self::Project,
        Self::Reason,
        Self::BlockedAt,
    ];

    /// Ordered keyword synonyms in match form.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Block => &["quadra", "bloco", "qd", "bl", "torre"],
            Self::Unit => &[
                "unidade",
                "unidades",
                "unid",
                "lote",
                "lotes",
                "casa",
                "apto",
                "apartamento",
                "un",
            ],
            Self::Type => &["tipo", "tipologia", "descricao", "planta"],
            Self::AreaBuilt => &[
                "area",
                "areaconstruida",
                "areatotal",
                "aream2",
                "areadolote",
                "metragem",
            ],
            Self::Yard => &["quintal", "areaquintal", "jardim", "areadescoberta"],
            Self::Garage => &["garagem", "vaga", "vagas", "estacionamento"],
            Self::PrivateArea => &["areaprivativa", "privativa", "areaprivada"],
            Self::IdealFraction => &["fracaoideal", "fracao", "fi"],
            Self::Value => &[
                "valor",
                "valor1x",
                "preco",
                "valoravista",
                "valortotal",
                "precototal",
            ],
            Self::Stage => &["etapa", "fase"],
            Self::Entry => &["entrada", "sinal", "ato"],
            Self::Project => &["empreendimento", "obra", "projeto", "empreend"],
            Self::Reason => &["motivo", "motivobloqueio", "justificativa", "observacao"],
            Self::BlockedAt => &["data", "databloqueio", "dtbloqueio"],
        }
    }

    /// Stable upper-case name used in diagnostics and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Block => "BLOCK",
            Self::Unit => "UNIT",
            Self::Type => "TYPE",
            Self::AreaBuilt => "AREA_BUILT",
            Self::Yard => "YARD",
            Self::Garage => "GARAGE",
            Self::PrivateArea => "PRIVATE_AREA",
            Self::IdealFraction => "IDEAL_FRACTION",
            Self::Value => "VALUE",
            Self::Stage => "STAGE",
            Self::Entry => "ENTRY",
            Self::Project => "PROJECT",
            Self::Reason => "REASON",
            Self::BlockedAt => "BLOCKED_AT",
        }
    }
}

impl fmt::Display for ColumnConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concept together with whether the transform requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptSpec {
    /// The concept to bind.
    pub concept: ColumnConcept,
    /// A required concept that fails to bind aborts the transform.
    pub required: bool,
}

impl ConceptSpec {
    /// A concept that must resolve.
    pub const fn required(concept: ColumnConcept) -> Self {
        Self {
            concept,
            required: true,
        }
    }

    /// A concept that may be absent.
    pub const fn optional(concept: ColumnConcept) -> Self {
        Self {
            concept,
            required: false,
        }
    }
}

/// Keywords that identify a per-block data header row by its first cell.
pub const UNIT_HEADER_KEYWORDS: &[&str] = &[
    "unidade",
    "unidades",
    "unid",
    "lote",
    "lotes",
    "casa",
    "apto",
    "apartamento",
];

/// Keywords that identify a carrier column in the header row.
pub const CARRIER_KEYWORDS: &[&str] = &["quadra", "qd", "bloco", "bl"];

/// Returns every keyword of every concept in `specs`, for header-row scoring.
pub fn header_keywords(specs: &[ConceptSpec]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = specs
        .iter()
        .flat_map(|s| s.concept.keywords().iter().copied())
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize_for_match;

    #[test]
    fn keywords_are_in_match_form() {
        for concept in ColumnConcept::ALL {
            for kw in concept.keywords() {
                assert_eq!(&normalize_for_match(kw), kw, "{concept}: {kw}");
            }
        }
    }

    #[test]
    fn header_keywords_are_deduplicated() {
        let kws = header_keywords(&[
            ConceptSpec::required(ColumnConcept::Unit),
            ConceptSpec::required(ColumnConcept::Unit),
            ConceptSpec::optional(ColumnConcept::Value),
        ]);
        assert_eq!(kws.iter().filter(|k| **k == "unidade").count(), 1);
        assert!(kws.contains(&"valor"));
    }
}
