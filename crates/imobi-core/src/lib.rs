//! Core model of the real-estate spreadsheet transforms.
//!
//! This crate holds everything that does not touch a file format: header
//! scanning and column resolution, row classification, block and stage
//! grouping, number parsing, display normalization and the installment
//! schedule. Readers and emitters live in `imobi-sheets`.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod blocked;
pub mod classify;
pub mod concept;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod group;
pub mod installments;
pub mod number;
pub mod pipeline;
pub mod record;
pub mod request;
pub mod resolve;
pub mod table;
pub mod text;

pub use blocked::{
    BlockedUnit, BlockedUnitFacets, BlockedUnitsFilter, EMPTY_REASON, blocked_unit_facets,
    collect_blocked_units,
};
pub use classify::{Classification, ClassifierVariant, RowClass, RowClassifier, classify};
pub use concept::{
    CARRIER_KEYWORDS, ColumnConcept, ConceptSpec, UNIT_HEADER_KEYWORDS, header_keywords,
};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{ErrorKind, TransformError};
pub use format::{
    AreaRule, NO_AREA, PCD_SUFFIX, area_label, block_code, currency_label, garage_label, is_pcd,
    numeric_or_warn, parse_area, parse_currency, text_label, unit_code, unit_name,
};
pub use group::{
    BlockGroup, StageGroup, StageMap, StageSource, UNMAPPED_STAGE, compare_keys, group_records,
    ideal_fractions,
};
pub use installments::{InstallmentParams, MAX_INSTALLMENT_YEARS};
pub use number::{
    Number, format_area, format_currency_brl, format_decimal_comma, format_fraction,
    parse_lot_area, parse_number, round2,
};
pub use pipeline::{PipelineState, StateTracker};
pub use record::{BlockKey, BlockPrefix, Record, UnitPrefix};
pub use request::{TransformKind, TransformParams, TransformRequest};
pub use resolve::{BoundColumn, HeaderMap, resolve_headers};
pub use table::{
    Carrier, CarrierRule, DEFAULT_SCAN_DEPTH, RawTable, ScanConfig, ScannedTable, locate_carrier,
    locate_header, scan,
};
pub use text::{first_integer, is_blank, is_placeholder, normalize_display, normalize_for_match};
