//! Canonical records: one data row with its stage and block carriers.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::concept::ColumnConcept;
use crate::text::{first_integer, normalize_for_match};

/// Prefix of an emitted block code (`BL01`, `QD03`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockPrefix {
    /// Apartment block.
    Bl,
    /// Quadra of lots.
    Qd,
}

impl BlockPrefix {
    /// Upper-case form used in unit names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bl => "BL",
            Self::Qd => "QD",
        }
    }

    /// Derives the prefix from a block title or carrier header.
    ///
    /// Anything mentioning `quadra`/`qd` is a quadra; everything else is a
    /// block.
    pub fn from_label(label: &str) -> Self {
        let key = normalize_for_match(label);
        if key.starts_with("quadra") || key.starts_with("qd") {
            Self::Qd
        } else {
            Self::Bl
        }
    }
}

/// Prefix of an emitted unit code (`APT 02`, `LOTE 05`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnitPrefix {
    /// Apartment.
    Apt,
    /// House.
    Casa,
    /// Lot.
    Lote,
}

impl UnitPrefix {
    /// Upper-case form used in unit names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::Casa => "CASA",
            Self::Lote => "LOTE",
        }
    }

    /// Chooses the prefix from the header of the unit column.
    pub fn from_header(header: &str) -> Self {
        let key = normalize_for_match(header);
        if key.contains("lote") {
            Self::Lote
        } else if key.contains("casa") {
            Self::Casa
        } else {
            Self::Apt
        }
    }
}

/// Identity of a block as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BlockKey {
    /// Title or carrier text, trimmed (`"BLOCO 01"`, `"QUADRA 03"`, `"03"`).
    pub original: String,
    /// First integer embedded in [`Self::original`].
    pub numeric: Option<u64>,
    /// Output prefix.
    pub prefix: BlockPrefix,
}

impl BlockKey {
    /// Builds a key from block text and the prefix chosen for it.
    pub fn new(original: &str, prefix: BlockPrefix) -> Self {
        let original = original.trim().to_owned();
        Self {
            numeric: first_integer(&original),
            original,
            prefix,
        }
    }
}

/// One data row, immutable once classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Zero-based row in the scanned table.
    pub row: usize,
    /// Stage key (`"ETAPA 01"`); empty for block-only inputs.
    pub stage: String,
    /// Block the row belongs to.
    pub block: BlockKey,
    /// Unit prefix from the header in effect for this row.
    pub unit_prefix: UnitPrefix,
    fields: BTreeMap<ColumnConcept, String>,
}

impl Record {
    /// Creates a record from its carriers and concept-keyed raw cells.
    pub fn new(
        row: usize,
        stage: String,
        block: BlockKey,
        unit_prefix: UnitPrefix,
        fields: BTreeMap<ColumnConcept, String>,
    ) -> Self {
        Self {
            row,
            stage,
            block,
            unit_prefix,
            fields,
        }
    }

    /// Raw cell for `concept`, or `None` when the column is not bound.
    pub fn raw(&self, concept: ColumnConcept) -> Option<&str> {
        self.fields.get(&concept).map(String::as_str)
    }

    /// Raw cell for `concept`, empty when the column is not bound.
    pub fn get(&self, concept: ColumnConcept) -> &str {
        self.raw(concept).unwrap_or("")
    }

    /// Returns a copy assigned to another stage.
    pub fn with_stage(&self, stage: &str) -> Self {
        Self {
            stage: stage.to_owned(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_prefix_from_label() {
        assert_eq!(BlockPrefix::from_label("QUADRA 03"), BlockPrefix::Qd);
        assert_eq!(BlockPrefix::from_label("Qd. 7"), BlockPrefix::Qd);
        assert_eq!(BlockPrefix::from_label("BLOCO 01"), BlockPrefix::Bl);
        assert_eq!(BlockPrefix::from_label("TORRE A"), BlockPrefix::Bl);
    }

    #[test]
    fn unit_prefix_from_header() {
        assert_eq!(UnitPrefix::from_header("UNIDADE"), UnitPrefix::Apt);
        assert_eq!(UnitPrefix::from_header("Nº do Lote"), UnitPrefix::Lote);
        assert_eq!(UnitPrefix::from_header("CASA"), UnitPrefix::Casa);
    }

    #[test]
    fn block_key_extracts_number() {
        let k = BlockKey::new("  BLOCO 07 ", BlockPrefix::Bl);
        assert_eq!(k.original, "BLOCO 07");
        assert_eq!(k.numeric, Some(7));
    }
}
