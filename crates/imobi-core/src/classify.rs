//! Row classification over a scanned sheet.
//!
//! Semi-structured price lists interleave title rows (`ETAPA 01`,
//! `BLOCO 02`, `QUADRA 03`), repeated per-block headers and data rows. The
//! classifier walks the table once, top to bottom, keeping the running stage
//! and block, and turns each data row into a [`Record`].
//!
//! Rules, checked in order against the first non-empty cell (the carrier
//! column is skipped, since forward-fill puts a value on every row):
//!
//! 1. begins with `etapa` → stage title;
//! 2. begins with `bloco` / `quadra` → block title;
//! 3. equals a unit-header keyword (`unidade`, `lote`, …) → local header;
//! 4. the unit column is non-empty → data row;
//! 5. otherwise blank or ignored.
//!
//! Rows above the sheet header only ever match rules 1 and 2; anything else
//! there is a banner and is ignored.
use std::collections::BTreeMap;

use crate::concept::{ColumnConcept, ConceptSpec, UNIT_HEADER_KEYWORDS};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::record::{BlockKey, BlockPrefix, Record, UnitPrefix};
use crate::resolve::{HeaderMap, resolve_headers};
use crate::table::ScannedTable;
use crate::text::{is_blank, normalize_for_match};

/// Classification of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// `ETAPA …` title.
    StageTitle,
    /// `BLOCO …` / `QUADRA …` title.
    BlockTitle,
    /// A repeated column header inside the sheet.
    DataHeader,
    /// A row that became a [`Record`].
    Data,
    /// A data row dropped for lack of a stage or block.
    Dropped,
    /// No non-empty cell.
    Blank,
    /// Non-empty, but matches no rule.
    Ignored,
}

/// Whether data rows need a stage title above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierVariant {
    /// Stage titles are expected; rows before any stage are dropped unless
    /// the stage comes from a caller-supplied map.
    StageAware {
        /// The caller supplies a block-to-stage map, so stage titles are
        /// optional.
        stage_from_map: bool,
    },
    /// Stage titles are recorded when present but never required.
    BlockOnly,
}

impl ClassifierVariant {
    fn requires_stage(self) -> bool {
        match self {
            Self::StageAware { stage_from_map } => !stage_from_map,
            Self::BlockOnly => false,
        }
    }
}

/// The classifier's output.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Data records in input order.
    pub records: Vec<Record>,
    /// Class of every row except the sheet header, as (row, class).
    pub classes: Vec<(usize, RowClass)>,
    /// Dropped rows, ignored headers and empty blocks.
    pub diagnostics: Diagnostics,
}

impl Classification {
    /// Class assigned to `row`, if it was classified.
    pub fn class_of(&self, row: usize) -> Option<RowClass> {
        self.classes
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, c)| *c)
    }
}

/// Stateful single-pass classifier.
#[derive(Debug)]
pub struct RowClassifier<'a> {
    scanned: &'a ScannedTable,
    sheet_map: &'a HeaderMap,
    specs: &'a [ConceptSpec],
    variant: ClassifierVariant,
    current_stage: Option<String>,
    current_block: Option<BlockKey>,
    local_map: Option<HeaderMap>,
    open_title: Option<(usize, String)>,
    rows_under_title: usize,
    out: Classification,
}

impl<'a> RowClassifier<'a> {
    /// Creates a classifier over `scanned`, using `sheet_map` until a local
    /// header replaces it.
    pub fn new(
        scanned: &'a ScannedTable,
        sheet_map: &'a HeaderMap,
        specs: &'a [ConceptSpec],
        variant: ClassifierVariant,
    ) -> Self {
        Self {
            scanned,
            sheet_map,
            specs,
            variant,
            current_stage: None,
            current_block: None,
            local_map: None,
            open_title: None,
            rows_under_title: 0,
            out: Classification::default(),
        }
    }

    /// Classifies every row except the sheet header.
    pub fn run(mut self) -> Classification {
        let scanned = self.scanned;
        for (index, row) in scanned.table.rows().iter().enumerate() {
            if index == scanned.header_row {
                continue;
            }
            let class = self.classify_row(index, row);
            self.out.classes.push((index, class));
        }
        self.close_title();
        tracing::debug!(
            records = self.out.records.len(),
            diagnostics = self.out.diagnostics.entries().len(),
            "rows classified"
        );
        self.out
    }

    /// First non-blank cell, ignoring the forward-filled carrier column below
    /// the header.
    fn first_non_empty<'r>(&self, index: usize, row: &'r [String]) -> Option<&'r str> {
        let carrier = self
            .scanned
            .carrier
            .as_ref()
            .map(|c| c.column)
            .filter(|_| index > self.scanned.header_row);
        row.iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != carrier)
            .map(|(_, c)| c.as_str())
            .find(|c| !is_blank(c))
    }

    fn classify_row(&mut self, index: usize, row: &[String]) -> RowClass {
        let Some(first) = self.first_non_empty(index, row) else {
            return RowClass::Blank;
        };
        let key = normalize_for_match(first);

        if key.starts_with("etapa") {
            self.close_title();
            self.current_stage = Some(first.trim().to_owned());
            self.current_block = None;
            self.local_map = None;
            return RowClass::StageTitle;
        }

        if key.starts_with("bloco") || key.starts_with("quadra") {
            self.close_title();
            self.current_block = Some(BlockKey::new(first, BlockPrefix::from_label(first)));
            self.open_title = Some((index, first.trim().to_owned()));
            self.local_map = None;
            return RowClass::BlockTitle;
        }

        if index < self.scanned.header_row {
            return RowClass::Ignored;
        }

        if UNIT_HEADER_KEYWORDS.contains(&key.as_str()) {
            match resolve_headers(row, self.specs) {
                Ok(map) => self.local_map = Some(map),
                Err(e) => self.out.diagnostics.warn(
                    DiagnosticCode::LocalHeaderIgnored,
                    Some(index),
                    format!("repeated header does not resolve ({e}); keeping the sheet header"),
                ),
            }
            return RowClass::DataHeader;
        }

        self.classify_data(index, row)
    }

    fn classify_data(&mut self, index: usize, row: &[String]) -> RowClass {
        let map = self.local_map.as_ref().unwrap_or(self.sheet_map);
        let Some(unit) = map.get(ColumnConcept::Unit) else {
            return RowClass::Ignored;
        };
        if row.get(unit.index).is_none_or(|c| is_blank(c)) {
            return RowClass::Ignored;
        }
        let unit_prefix = UnitPrefix::from_header(&unit.header);

        let carried = self.scanned.carrier.as_ref().and_then(|c| {
            row.get(c.column)
                .filter(|v| !is_blank(v))
                .map(|v| BlockKey::new(v, c.prefix))
        });
        let Some(block) = carried.or_else(|| self.current_block.clone()) else {
            self.out.diagnostics.warn(
                DiagnosticCode::RowWithoutBlock,
                Some(index),
                "data row appears before any block; dropped",
            );
            return RowClass::Dropped;
        };

        let stage = match (&self.current_stage, self.variant.requires_stage()) {
            (Some(stage), _) => stage.clone(),
            (None, false) => String::new(),
            (None, true) => {
                self.out.diagnostics.warn(
                    DiagnosticCode::RowWithoutStage,
                    Some(index),
                    "data row appears before any stage; dropped",
                );
                return RowClass::Dropped;
            }
        };

        let fields: BTreeMap<ColumnConcept, String> = map
            .iter()
            .map(|(concept, bound)| {
                let cell = row.get(bound.index).cloned().unwrap_or_default();
                (concept, cell)
            })
            .collect();

        self.rows_under_title += 1;
        self.out
            .records
            .push(Record::new(index, stage, block, unit_prefix, fields));
        RowClass::Data
    }

    fn close_title(&mut self) {
        if let Some((row, title)) = self.open_title.take() {
            if self.rows_under_title == 0 {
                self.out.diagnostics.info(
                    DiagnosticCode::EmptyBlock,
                    Some(row),
                    format!("{title} has no data rows; omitted"),
                );
            }
        }
        self.rows_under_title = 0;
    }
}

/// Classifies `scanned` with `sheet_map` in one pass.
pub fn classify(
    scanned: &ScannedTable,
    sheet_map: &HeaderMap,
    specs: &[ConceptSpec],
    variant: ClassifierVariant,
) -> Classification {
    RowClassifier::new(scanned, sheet_map, specs, variant).run()
}
