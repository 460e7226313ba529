//! Binds column concepts to the header strings actually present in a sheet.
//!
//! Resolution runs in two global passes so that an exact match for one
//! concept is never stolen by a substring match for another:
//!
//! 1. For every concept, the first keyword (in declared order) that equals a
//!    normalized header wins.
//! 2. For every concept still unbound, headers containing a keyword are
//!    ranked by (starts-with-keyword first, shorter normalized length) and
//!    the best one wins.
//!
//! A header bound in either pass is not offered to later concepts. Keywords
//! shorter than four characters (`un`, `qd`, `fi`) only ever match exactly.
use std::collections::{BTreeMap, HashSet};

use crate::concept::{ColumnConcept, ConceptSpec};
use crate::error::TransformError;
use crate::text::normalize_for_match;

/// Keywords shorter than this take part in exact matching only.
const MIN_PARTIAL_KEYWORD_LEN: usize = 4;

/// A concept bound to a concrete column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundColumn {
    /// Zero-based column index in the scanned table.
    pub index: usize,
    /// Header text as it appeared in the input.
    pub header: String,
}

/// Mapping from concept to the column that carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    bound: BTreeMap<ColumnConcept, BoundColumn>,
}

impl HeaderMap {
    /// Returns the column bound to `concept`, if any.
    pub fn get(&self, concept: ColumnConcept) -> Option<&BoundColumn> {
        self.bound.get(&concept)
    }

    /// Returns the column index bound to `concept`, if any.
    pub fn index(&self, concept: ColumnConcept) -> Option<usize> {
        self.bound.get(&concept).map(|b| b.index)
    }

    /// Returns `true` when `concept` is bound.
    pub fn contains(&self, concept: ColumnConcept) -> bool {
        self.bound.contains_key(&concept)
    }

    /// Iterates bound concepts in concept order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnConcept, &BoundColumn)> {
        self.bound.iter().map(|(c, b)| (*c, b))
    }

    /// Binds `concept` to a column directly.
    pub fn insert(&mut self, concept: ColumnConcept, column: BoundColumn) {
        self.bound.insert(concept, column);
    }
}

/// Resolves `specs` against `headers`.
///
/// Blank headers are never bound.
///
/// # Errors
///
/// Returns [`TransformError::ColumnNotFound`] for the first required concept
/// (in `specs` order) that has no matching header. The error lists every
/// non-blank header so the operator can see what the file actually contains.
pub fn resolve_headers(
    headers: &[String],
    specs: &[ConceptSpec],
) -> Result<HeaderMap, TransformError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_for_match(h)).collect();
    let mut taken: HashSet<usize> = HashSet::new();
    let mut map = HeaderMap::default();

    for spec in specs {
        if map.contains(spec.concept) {
            continue;
        }
        if let Some(index) = exact_match(&normalized, spec.concept, &taken) {
            taken.insert(index);
            map.insert(spec.concept, bound(headers, index));
        }
    }

    for spec in specs {
        if map.contains(spec.concept) {
            continue;
        }
        if let Some(index) = partial_match(&normalized, spec.concept, &taken) {
            taken.insert(index);
            map.insert(spec.concept, bound(headers, index));
        }
    }

    if let Some(missing) = specs
        .iter()
        .find(|s| s.required && !map.contains(s.concept))
    {
        return Err(TransformError::ColumnNotFound {
            concept: missing.concept,
            available: headers
                .iter()
                .map(|h| h.trim().to_owned())
                .filter(|h| !h.is_empty())
                .collect(),
        });
    }

    tracing::debug!(
        bound = ?map.iter().map(|(c, b)| format!("{c}={}", b.header)).collect::<Vec<_>>(),
        "resolved headers"
    );
    Ok(map)
}

fn bound(headers: &[String], index: usize) -> BoundColumn {
    BoundColumn {
        index,
        header: headers[index].trim().to_owned(),
    }
}

fn exact_match(normalized: &[String], concept: ColumnConcept, taken: &HashSet<usize>) -> Option<usize> {
    concept.keywords().iter().find_map(|kw| {
        normalized
            .iter()
            .enumerate()
            .find(|(i, h)| !taken.contains(i) && h.as_str() == *kw)
            .map(|(i, _)| i)
    })
}

fn partial_match(
    normalized: &[String],
    concept: ColumnConcept,
    taken: &HashSet<usize>,
) -> Option<usize> {
    let mut candidates: Vec<(u8, usize, usize)> = Vec::new();
    for kw in concept.keywords() {
        if kw.len() < MIN_PARTIAL_KEYWORD_LEN {
            continue;
        }
        for (i, h) in normalized.iter().enumerate() {
            if taken.contains(&i) || h.is_empty() || !h.contains(kw) {
                continue;
            }
            let priority = u8::from(!h.starts_with(kw));
            candidates.push((priority, h.len(), i));
        }
    }
    candidates.sort_unstable();
    candidates.first().map(|&(_, _, i)| i)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn exact_match_ignores_accents_and_case() {
        let h = headers(&["UNIDADE", "TIPO", "ÁREA", "QUINTAL", "GARAGEM", "VALOR"]);
        let map = resolve_headers(
            &h,
            &[
                ConceptSpec::required(ColumnConcept::Unit),
                ConceptSpec::optional(ColumnConcept::AreaBuilt),
                ConceptSpec::required(ColumnConcept::Value),
            ],
        )
        .expect("resolves");
        assert_eq!(map.index(ColumnConcept::Unit), Some(0));
        assert_eq!(map.index(ColumnConcept::AreaBuilt), Some(2));
        assert_eq!(map.get(ColumnConcept::Value).map(|b| b.header.as_str()), Some("VALOR"));
    }

    #[test]
    fn partial_prefers_prefix_then_shorter() {
        let h = headers(&["Total do valor", "Valor de tabela com desconto", "Valor tabela"]);
        let map = resolve_headers(&h, &[ConceptSpec::required(ColumnConcept::Value)])
            .expect("resolves");
        assert_eq!(map.index(ColumnConcept::Value), Some(2));
    }

    #[test]
    fn exact_match_is_not_stolen_by_partial() {
        let h = headers(&["Área Privativa", "Área Construída"]);
        let map = resolve_headers(
            &h,
            &[
                ConceptSpec::optional(ColumnConcept::AreaBuilt),
                ConceptSpec::required(ColumnConcept::PrivateArea),
            ],
        )
        .expect("resolves");
        assert_eq!(map.index(ColumnConcept::PrivateArea), Some(0));
        assert_eq!(map.index(ColumnConcept::AreaBuilt), Some(1));
    }

    #[test]
    fn valor_1x_is_accepted_as_value() {
        let h = headers(&["LOTE", "VALOR (1x)"]);
        let map = resolve_headers(&h, &[ConceptSpec::required(ColumnConcept::Value)])
            .expect("resolves");
        assert_eq!(map.index(ColumnConcept::Value), Some(1));
    }

    #[test]
    fn short_keywords_only_match_exactly() {
        let h = headers(&["CONTRATO"]);
        let map = resolve_headers(&h, &[ConceptSpec::optional(ColumnConcept::Entry)])
            .expect("optional never fails");
        assert!(!map.contains(ColumnConcept::Entry));
    }

    #[test]
    fn missing_required_names_concept_and_headers() {
        let h = headers(&["UNIDADE", "TIPO", ""]);
        let err = resolve_headers(
            &h,
            &[
                ConceptSpec::required(ColumnConcept::Unit),
                ConceptSpec::required(ColumnConcept::Value),
            ],
        )
        .expect_err("VALUE is missing");
        match err {
            TransformError::ColumnNotFound { concept, available } => {
                assert_eq!(concept, ColumnConcept::Value);
                assert_eq!(available, vec!["UNIDADE".to_owned(), "TIPO".to_owned()]);
            }
            other => panic!("expected ColumnNotFound, got {other:?}"),
        }
    }
}
