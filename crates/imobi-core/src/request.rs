//! Transform requests: which pipeline to run and its typed parameters.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blocked::BlockedUnitsFilter;
use crate::error::TransformError;
use crate::group::StageMap;
use crate::installments::InstallmentParams;

/// The available transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    /// Styled price table grouped by stage and block.
    PriceTable,
    /// Styled lot table with yearly monthly installments.
    LotInstallments,
    /// ERP unit import CSV.
    SiengeUnits,
    /// Normalized incorporation registry workbook.
    Incorporation,
    /// Filtered blocked-units report.
    BlockedUnits,
}

impl TransformKind {
    /// Every kind.
    pub const ALL: [TransformKind; 5] = [
        Self::PriceTable,
        Self::LotInstallments,
        Self::SiengeUnits,
        Self::Incorporation,
        Self::BlockedUnits,
    ];

    /// Kebab-case name, as used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::PriceTable => "price-table",
            Self::LotInstallments => "lot-installments",
            Self::SiengeUnits => "sienge-units",
            Self::Incorporation => "incorporation",
            Self::BlockedUnits => "blocked-units",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransformParams {
    /// Price table; an optional map replaces stage titles.
    PriceTable {
        /// `block → stage` assignment keyed by original block text.
        #[serde(default)]
        stage_map: Option<StageMap>,
    },
    /// Lot installments.
    LotInstallments(InstallmentParams),
    /// ERP unit import.
    SiengeUnits,
    /// Incorporation registry.
    Incorporation,
    /// Blocked-units report.
    BlockedUnits(BlockedUnitsFilter),
}

impl TransformParams {
    /// The transform these parameters belong to.
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::PriceTable { .. } => TransformKind::PriceTable,
            Self::LotInstallments(_) => TransformKind::LotInstallments,
            Self::SiengeUnits => TransformKind::SiengeUnits,
            Self::Incorporation => TransformKind::Incorporation,
            Self::BlockedUnits(_) => TransformKind::BlockedUnits,
        }
    }
}

/// A transform request: kind-specific parameters plus scanner overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Kind and parameters.
    pub params: TransformParams,
    /// Overrides the kind's header-detection threshold.
    #[serde(default)]
    pub header_threshold: Option<usize>,
    /// Overrides the number of leading rows searched for the header.
    #[serde(default)]
    pub scan_depth: Option<usize>,
}

impl TransformRequest {
    /// A request with default scanner settings.
    pub fn new(params: TransformParams) -> Self {
        Self {
            params,
            header_threshold: None,
            scan_depth: None,
        }
    }

    /// The requested transform.
    pub fn kind(&self) -> TransformKind {
        self.params.kind()
    }

    /// Validates every parameter before any input is read.
    ///
    /// # Errors
    ///
    /// [`TransformError::ParameterInvalid`] naming the offending parameter.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.header_threshold == Some(0) {
            return Err(TransformError::ParameterInvalid {
                name: "header_threshold",
                detail: "must be at least 1".to_owned(),
            });
        }
        if self.scan_depth == Some(0) {
            return Err(TransformError::ParameterInvalid {
                name: "scan_depth",
                detail: "must be at least 1".to_owned(),
            });
        }
        match &self.params {
            TransformParams::LotInstallments(p) => p.validate(),
            TransformParams::PriceTable { stage_map: Some(map) } if map.is_empty() => {
                Err(TransformError::ParameterInvalid {
                    name: "stage_map",
                    detail: "must map at least one block".to_owned(),
                })
            }
            TransformParams::PriceTable { .. }
            | TransformParams::SiengeUnits
            | TransformParams::Incorporation
            | TransformParams::BlockedUnits(_) => Ok(()),
        }
    }
}
