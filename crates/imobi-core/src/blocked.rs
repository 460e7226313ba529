//! Blocked-units reports: flat rows, project/reason filters and facets.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::concept::ColumnConcept;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::TransformError;
use crate::resolve::HeaderMap;
use crate::table::ScannedTable;
use crate::text::{is_blank, normalize_display};

/// Filter token matching an empty reason.
pub const EMPTY_REASON: &str = "<EMPTY>";

/// One row of a blocked-units report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedUnit {
    /// Zero-based table row.
    pub row: usize,
    /// Project name as written.
    pub project: String,
    /// Unit identifier as written.
    pub unit: String,
    /// Blocking reason; may be empty.
    pub reason: String,
    /// Blocking date as written; empty when the column is absent.
    pub blocked_at: String,
}

impl BlockedUnit {
    /// Reason key used by filters and facets: display-normalized, or
    /// [`EMPTY_REASON`].
    pub fn reason_key(&self) -> String {
        if is_blank(&self.reason) {
            EMPTY_REASON.to_owned()
        } else {
            normalize_display(&self.reason)
        }
    }

    /// Project key used by filters and facets.
    pub fn project_key(&self) -> String {
        normalize_display(&self.project)
    }
}

/// Reads every row below the header that names a project or a unit.
pub fn collect_blocked_units(scanned: &ScannedTable, map: &HeaderMap) -> Vec<BlockedUnit> {
    let cell = |row: usize, concept: ColumnConcept| {
        map.index(concept)
            .map_or("", |col| scanned.table.cell(row, col))
            .to_owned()
    };
    (scanned.header_row + 1..scanned.table.len())
        .map(|row| BlockedUnit {
            row,
            project: cell(row, ColumnConcept::Project),
            unit: cell(row, ColumnConcept::Unit),
            reason: cell(row, ColumnConcept::Reason),
            blocked_at: cell(row, ColumnConcept::BlockedAt),
        })
        .filter(|u| !is_blank(&u.project) || !is_blank(&u.unit))
        .collect()
}

/// Projects and reasons a caller wants removed from the report.
///
/// Entries compare display-normalized, so `"Residencial Ípê"` matches
/// `"RESIDENCIAL IPE"`. [`EMPTY_REASON`] matches rows without a reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedUnitsFilter {
    /// Projects to drop.
    #[serde(default)]
    pub ignored_projects: Vec<String>,
    /// Reasons to drop.
    #[serde(default)]
    pub ignored_reasons: Vec<String>,
}

impl BlockedUnitsFilter {
    /// Applies the filter, recording each removed row as an info diagnostic.
    ///
    /// # Errors
    ///
    /// [`TransformError::EmptyAfterFilter`] when no row survives.
    pub fn apply(
        &self,
        units: Vec<BlockedUnit>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<BlockedUnit>, TransformError> {
        let projects = Self::keys(&self.ignored_projects);
        let reasons = Self::keys(&self.ignored_reasons);
        let kept: Vec<BlockedUnit> = units
            .into_iter()
            .filter(|u| {
                let project = u.project_key();
                let reason = u.reason_key();
                if projects.contains(&project) {
                    diagnostics.info(
                        DiagnosticCode::Filtered,
                        Some(u.row),
                        format!("ignored project {project}"),
                    );
                    false
                } else if reasons.contains(&reason) {
                    diagnostics.info(
                        DiagnosticCode::Filtered,
                        Some(u.row),
                        format!("ignored reason {reason}"),
                    );
                    false
                } else {
                    true
                }
            })
            .collect();
        if kept.is_empty() {
            return Err(TransformError::EmptyAfterFilter);
        }
        Ok(kept)
    }

    fn keys(values: &[String]) -> BTreeSet<String> {
        values
            .iter()
            .map(|v| {
                if v.trim() == EMPTY_REASON {
                    EMPTY_REASON.to_owned()
                } else {
                    normalize_display(v)
                }
            })
            .collect()
    }
}

/// Distinct filter choices offered to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockedUnitFacets {
    /// Sorted distinct project keys.
    pub projects: Vec<String>,
    /// Sorted distinct reason keys, [`EMPTY_REASON`] included when present.
    pub reasons: Vec<String>,
}

/// Collects the sorted distinct projects and reasons of `units`.
pub fn blocked_unit_facets(units: &[BlockedUnit]) -> BlockedUnitFacets {
    let projects: BTreeSet<String> = units
        .iter()
        .map(BlockedUnit::project_key)
        .filter(|p| !p.is_empty())
        .collect();
    let reasons: BTreeSet<String> = units.iter().map(BlockedUnit::reason_key).collect();
    BlockedUnitFacets {
        projects: projects.into_iter().collect(),
        reasons: reasons.into_iter().collect(),
    }
}
