//! Stage and block grouping, ordering and ideal fractions.
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::record::{BlockKey, Record};
use crate::text::{first_integer, normalize_display};

/// Stage assigned to blocks missing from a supplied [`StageMap`].
pub const UNMAPPED_STAGE: &str = "UNMAPPED";

/// Caller-supplied `block → stage` assignment, keyed by the block text as it
/// appears in the input (`"BLOCO 03"`, `"QUADRA 7"`, `"03"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageMap(BTreeMap<String, String>);

impl StageMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `block` to `stage`.
    pub fn insert(&mut self, block: impl Into<String>, stage: impl Into<String>) {
        self.0.insert(block.into().trim().to_owned(), stage.into().trim().to_owned());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no block is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stage of `block`: exact key first, then a display-normalized match so
    /// `"Bloco 03"` finds `"BLOCO 03"`.
    pub fn lookup(&self, block: &BlockKey) -> Option<&str> {
        if let Some(stage) = self.0.get(&block.original) {
            return Some(stage);
        }
        let wanted = normalize_display(&block.original);
        self.0
            .iter()
            .find(|(k, _)| normalize_display(k) == wanted)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StageMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Where each record's stage comes from.
#[derive(Debug, Clone, Copy)]
pub enum StageSource<'a> {
    /// The classifier's running stage.
    Classifier,
    /// A caller-supplied map; authoritative over any stage titles.
    Map(&'a StageMap),
}

/// The records of one block, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGroup {
    /// Block identity.
    pub key: BlockKey,
    /// Records in input order.
    pub records: Vec<Record>,
}

/// The blocks of one stage, ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct StageGroup {
    /// Stage key; empty for block-only inputs.
    pub key: String,
    /// Blocks in output order.
    pub blocks: Vec<BlockGroup>,
}

impl StageGroup {
    /// Every record of the stage, block by block.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.blocks.iter().flat_map(|b| b.records.iter())
    }

    /// Number of records in the stage.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.records.len()).sum()
    }

    /// Returns `true` when the stage has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compares keys by first embedded integer; keys without one sort last; ties
/// by the original text.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    compare_numbered((first_integer(a), a), (first_integer(b), b))
}

fn compare_numbered(a: (Option<u64>, &str), b: (Option<u64>, &str)) -> Ordering {
    match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(b.1),
    }
}

/// Groups `records` by stage and block, then orders both levels.
///
/// With [`StageSource::Map`] every record's stage is replaced by the mapped
/// stage; blocks missing from the map land in [`UNMAPPED_STAGE`], which sorts
/// after every other stage, with one warning per block.
pub fn group_records(
    records: Vec<Record>,
    source: StageSource<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<StageGroup> {
    let mut unmapped: BTreeSet<String> = BTreeSet::new();
    let mut stages: Vec<StageGroup> = Vec::new();

    for record in records {
        let record = match source {
            StageSource::Classifier => record,
            StageSource::Map(map) => match map.lookup(&record.block) {
                Some(stage) => record.with_stage(stage),
                None => {
                    if unmapped.insert(record.block.original.clone()) {
                        diagnostics.warn(
                            DiagnosticCode::UnmappedBlock,
                            Some(record.row),
                            format!(
                                "block {:?} has no stage in the supplied map; placed in {UNMAPPED_STAGE}",
                                record.block.original
                            ),
                        );
                    }
                    record.with_stage(UNMAPPED_STAGE)
                }
            },
        };

        let stage_pos = match stages.iter().position(|s| s.key == record.stage) {
            Some(pos) => pos,
            None => {
                stages.push(StageGroup {
                    key: record.stage.clone(),
                    blocks: Vec::new(),
                });
                stages.len() - 1
            }
        };
        let stage = &mut stages[stage_pos];
        match stage
            .blocks
            .iter_mut()
            .find(|b| b.key.original == record.block.original)
        {
            Some(block) => block.records.push(record),
            None => stage.blocks.push(BlockGroup {
                key: record.block.clone(),
                records: vec![record],
            }),
        }
    }

    stages.sort_by(|a, b| {
        (a.key == UNMAPPED_STAGE)
            .cmp(&(b.key == UNMAPPED_STAGE))
            .then_with(|| compare_keys(&a.key, &b.key))
    });
    for stage in &mut stages {
        stage.blocks.sort_by(|a, b| {
            compare_numbered(
                (a.key.numeric, &a.key.original),
                (b.key.numeric, &b.key.original),
            )
        });
    }
    tracing::debug!(
        stages = stages.len(),
        blocks = stages.iter().map(|s| s.blocks.len()).sum::<usize>(),
        "records grouped"
    );
    stages
}

/// Shares of `areas` over their sum.
///
/// Absent areas count as zero. When the sum is zero every share is zero.
pub fn ideal_fractions(areas: &[Option<f64>]) -> Vec<f64> {
    let total: f64 = areas.iter().flatten().sum();
    if total == 0.0 || !total.is_finite() {
        return vec![0.0; areas.len()];
    }
    areas
        .iter()
        .map(|a| a.map_or(0.0, |v| v / total))
        .collect()
}
