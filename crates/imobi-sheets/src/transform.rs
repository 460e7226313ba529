//! Transform orchestration.
//!
//! [`run_transform`] takes a request and the input bytes, assembles the
//! pipeline for the requested kind and walks it through the state machine:
//!
//! ```text
//! IDLE → READING → SCANNED → RESOLVED → CLASSIFIED → GROUPED → EMITTING → DONE
//! ```
//!
//! Each kind differs only in its assembly: concept set, header threshold,
//! carrier rule, classifier variant, formatters and emitter. Bytes are
//! returned only from `DONE`.
mod blocked_units;
mod incorporation;
mod lot_installments;
mod price_table;
mod sienge_units;

use imobi_core::{
    BlockKey, BlockPrefix, BlockedUnitFacets, CarrierRule, ClassifierVariant, ColumnConcept,
    ConceptSpec, DEFAULT_SCAN_DEPTH, Diagnostics, HeaderMap, PipelineState, ScanConfig,
    ScannedTable, StageGroup, StageSource, StateTracker, TransformError, TransformKind,
    TransformParams, TransformRequest, classify, collect_blocked_units, group_records,
    header_keywords, normalize_display, resolve_headers, scan,
};

use crate::error::EmitError;
use crate::input::read_table;

/// Format of the produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Office Open XML workbook.
    Xlsx,
    /// `;`-separated text with a UTF-8 BOM.
    Csv,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// A successful transform: the artifact and the per-row findings.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Artifact bytes.
    pub bytes: Vec<u8>,
    /// Artifact format.
    pub format: OutputFormat,
    /// Findings collected along the way.
    pub diagnostics: Diagnostics,
}

/// Static configuration of one pipeline.
#[derive(Debug, Clone)]
pub(crate) struct Assembly {
    /// Concepts to bind, in resolution order.
    pub specs: Vec<ConceptSpec>,
    /// Default header-row threshold.
    pub threshold: usize,
    /// Carrier column handling.
    pub carrier: CarrierRule,
    /// When set, at least one of PRIVATE_AREA / AREA_BUILT must bind; the
    /// concept is the one reported when neither does.
    pub area_required: Option<ColumnConcept>,
}

impl Assembly {
    pub fn for_kind(kind: TransformKind) -> Self {
        use ColumnConcept::{
            AreaBuilt, Block, BlockedAt, Entry, Garage, IdealFraction, PrivateArea, Project,
            Reason, Type, Unit, Value, Yard,
        };
        let req = ConceptSpec::required;
        let opt = ConceptSpec::optional;
        match kind {
            TransformKind::PriceTable => Self {
                specs: vec![
                    req(Unit),
                    req(Value),
                    opt(Type),
                    opt(PrivateArea),
                    opt(AreaBuilt),
                    opt(Yard),
                    opt(Garage),
                    opt(Block),
                ],
                threshold: 3,
                carrier: CarrierRule::Optional,
                area_required: None,
            },
            TransformKind::LotInstallments => Self {
                specs: vec![
                    req(Unit),
                    req(Value),
                    opt(Entry),
                    opt(AreaBuilt),
                    opt(PrivateArea),
                    opt(Block),
                ],
                threshold: 3,
                carrier: CarrierRule::Required,
                area_required: Some(AreaBuilt),
            },
            TransformKind::SiengeUnits => Self {
                specs: vec![
                    req(Unit),
                    opt(PrivateArea),
                    opt(AreaBuilt),
                    opt(Type),
                    opt(Value),
                    opt(Block),
                ],
                threshold: 2,
                carrier: CarrierRule::Optional,
                area_required: Some(PrivateArea),
            },
            TransformKind::Incorporation => Self {
                specs: vec![
                    req(Unit),
                    opt(PrivateArea),
                    opt(AreaBuilt),
                    opt(Block),
                    opt(Garage),
                    opt(IdealFraction),
                ],
                threshold: 2,
                carrier: CarrierRule::Optional,
                area_required: Some(PrivateArea),
            },
            TransformKind::BlockedUnits => Self {
                specs: vec![req(Project), req(Unit), req(Reason), opt(BlockedAt)],
                threshold: 3,
                carrier: CarrierRule::Ignore,
                area_required: None,
            },
        }
    }

    pub fn scan_config(&self, request: &TransformRequest) -> ScanConfig {
        ScanConfig {
            header_keywords: header_keywords(&self.specs),
            threshold: request.header_threshold.unwrap_or(self.threshold),
            scan_depth: request.scan_depth.unwrap_or(DEFAULT_SCAN_DEPTH),
            carrier: self.carrier,
        }
    }

    /// Resolves the concept set, then the area either-or requirement.
    pub fn resolve(&self, headers: &[String]) -> Result<HeaderMap, TransformError> {
        let map = resolve_headers(headers, &self.specs)?;
        if let Some(concept) = self.area_required {
            if !map.contains(ColumnConcept::PrivateArea) && !map.contains(ColumnConcept::AreaBuilt)
            {
                return Err(TransformError::ColumnNotFound {
                    concept,
                    available: headers
                        .iter()
                        .map(|h| h.trim().to_owned())
                        .filter(|h| !h.is_empty())
                        .collect(),
                });
            }
        }
        Ok(map)
    }
}

/// A resolved sheet plus the running state shared by the kind modules.
pub(crate) struct Context<'a> {
    pub assembly: Assembly,
    pub scanned: ScannedTable,
    pub map: HeaderMap,
    pub tracker: &'a mut StateTracker,
    pub diagnostics: Diagnostics,
}

impl Context<'_> {
    /// Classifies and groups the sheet.
    ///
    /// # Errors
    ///
    /// [`TransformError::EmptyAfterFilter`] when the classifier keeps no row.
    pub fn classify_and_group(
        &mut self,
        variant: ClassifierVariant,
        source: StageSource<'_>,
    ) -> Result<Vec<StageGroup>, TransformError> {
        let classification = classify(&self.scanned, &self.map, &self.assembly.specs, variant);
        self.diagnostics.extend(classification.diagnostics);
        self.tracker.advance(PipelineState::Classified);
        if classification.records.is_empty() {
            tracing::debug!(
                warnings = self.diagnostics.warning_count(),
                "classifier kept no row"
            );
            return Err(TransformError::EmptyAfterFilter);
        }
        let groups = group_records(classification.records, source, &mut self.diagnostics);
        self.tracker.advance(PipelineState::Grouped);
        Ok(groups)
    }

    /// The concept holding the unit's area: PRIVATE_AREA when bound, else
    /// AREA_BUILT.
    pub fn area_concept(&self) -> Option<ColumnConcept> {
        [ColumnConcept::PrivateArea, ColumnConcept::AreaBuilt]
            .into_iter()
            .find(|c| self.map.contains(*c))
    }

    /// Enters `EMITTING`, runs `write` and packages its bytes with the
    /// collected diagnostics.
    pub fn emit(
        &mut self,
        format: OutputFormat,
        write: impl FnOnce() -> Result<Vec<u8>, EmitError>,
    ) -> Result<TransformOutput, TransformError> {
        self.tracker.advance(PipelineState::Emitting);
        let bytes = write()?;
        Ok(TransformOutput {
            bytes,
            format,
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }
}

/// Display title of a block: `BLOCO 01`, `QUADRA 03`.
///
/// Carrier values are often bare numbers (`03`); those get the word implied
/// by the carrier header.
pub(crate) fn block_title(key: &BlockKey) -> String {
    let text = normalize_display(&key.original);
    if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return text;
    }
    let word = match key.prefix {
        BlockPrefix::Bl => "BLOCO",
        BlockPrefix::Qd => "QUADRA",
    };
    format!("{word} {text}")
}

/// Runs one transform.
///
/// # Errors
///
/// The classified [`TransformError`] of the state the pipeline failed in. No
/// bytes are produced on error.
pub fn run_transform(
    request: &TransformRequest,
    input: &[u8],
) -> Result<TransformOutput, TransformError> {
    let kind = request.kind();
    let span = tracing::info_span!("transform", kind = %kind);
    let _entered = span.enter();
    let mut tracker = StateTracker::new(kind.name());

    match run(request, input, &mut tracker) {
        Ok(output) => {
            tracker.advance(PipelineState::Done);
            tracing::info!(
                bytes = output.bytes.len(),
                warnings = output.diagnostics.warning_count(),
                "transform complete"
            );
            Ok(output)
        }
        Err(e) => {
            let e = tracker.fail(e);
            tracing::warn!(state = %tracker.state(), "transform failed: {e}");
            Err(e)
        }
    }
}

fn run(
    request: &TransformRequest,
    input: &[u8],
    tracker: &mut StateTracker,
) -> Result<TransformOutput, TransformError> {
    request.validate()?;
    let assembly = Assembly::for_kind(request.kind());

    tracker.advance(PipelineState::Reading);
    let table = read_table(input)?;
    let scanned = scan(table, &assembly.scan_config(request))?;
    tracker.advance(PipelineState::Scanned);
    let map = assembly.resolve(&scanned.headers)?;
    tracker.advance(PipelineState::Resolved);

    let mut ctx = Context {
        assembly,
        scanned,
        map,
        tracker,
        diagnostics: Diagnostics::new(),
    };
    match &request.params {
        TransformParams::PriceTable { stage_map } => price_table::run(&mut ctx, stage_map.as_ref()),
        TransformParams::LotInstallments(params) => lot_installments::run(&mut ctx, params),
        TransformParams::SiengeUnits => sienge_units::run(&mut ctx),
        TransformParams::Incorporation => incorporation::run(&mut ctx),
        TransformParams::BlockedUnits(filter) => blocked_units::run(&mut ctx, filter),
    }
}

/// Reads a blocked-units report and returns its distinct projects and reasons.
///
/// # Errors
///
/// Input, header and column errors as for the blocked-units transform.
pub fn blocked_unit_facets(
    input: &[u8],
    header_threshold: Option<usize>,
) -> Result<BlockedUnitFacets, TransformError> {
    let mut request = TransformRequest::new(TransformParams::BlockedUnits(Default::default()));
    request.header_threshold = header_threshold;
    request.validate()?;
    let assembly = Assembly::for_kind(TransformKind::BlockedUnits);
    let scanned = scan(read_table(input)?, &assembly.scan_config(&request))?;
    let map = assembly.resolve(&scanned.headers)?;
    let units = collect_blocked_units(&scanned, &map);
    Ok(imobi_core::blocked_unit_facets(&units))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_titles_get_the_implied_word() {
        assert_eq!(block_title(&BlockKey::new("03", BlockPrefix::Qd)), "QUADRA 03");
        assert_eq!(block_title(&BlockKey::new("Bloco 1", BlockPrefix::Bl)), "BLOCO 1");
        assert_eq!(block_title(&BlockKey::new("Torre Á", BlockPrefix::Bl)), "TORRE A");
    }

    #[test]
    fn either_area_is_enforced() {
        let assembly = Assembly::for_kind(TransformKind::SiengeUnits);
        let headers: Vec<String> = ["UNIDADE", "TIPO"].iter().map(|s| (*s).to_owned()).collect();
        assert!(matches!(
            assembly.resolve(&headers),
            Err(TransformError::ColumnNotFound {
                concept: ColumnConcept::PrivateArea,
                ..
            })
        ));
        let headers: Vec<String> = ["UNIDADE", "ÁREA"].iter().map(|s| (*s).to_owned()).collect();
        assert!(assembly.resolve(&headers).is_ok());
    }

    #[test]
    fn threshold_override_applies() {
        let assembly = Assembly::for_kind(TransformKind::PriceTable);
        let mut request = TransformRequest::new(TransformParams::PriceTable { stage_map: None });
        assert_eq!(assembly.scan_config(&request).threshold, 3);
        request.header_threshold = Some(5);
        assert_eq!(assembly.scan_config(&request).threshold, 5);
    }
}
