//! Row plan of a sectioned workbook.
//!
//! The plan is computed once from the sections and drives both value
//! placement and styling, so the two can never disagree about which row is
//! which.
//!
//! ```text
//! (blank) (blank)
//! TITLE                      merged
//! (blank)
//! STAGE                      merged, omitted for an untitled stage
//! (blank)
//! BLOCK                      merged
//! (blank)
//! header
//! data …
//! (blank)                    one between blocks, two between stages
//! ```
use crate::export::table::Row;

/// Leading blank rows before the title band.
pub const LEADING_BLANK_ROWS: usize = 2;

/// The rows of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSection {
    /// Merged title text (`BLOCO 01`).
    pub title: String,
    /// Formatted data rows.
    pub rows: Vec<Row>,
}

/// The blocks of one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSection {
    /// Merged title text (`ETAPA 01`); empty for block-only outputs, in which
    /// case no stage band is written.
    pub title: String,
    /// Blocks in output order.
    pub blocks: Vec<BlockSection>,
}

/// What a sheet row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Nothing.
    Blank,
    /// The sheet title band.
    Title,
    /// Stage band of `stages[stage]`.
    StageTitle {
        /// Stage index.
        stage: usize,
    },
    /// Block band of `stages[stage].blocks[block]`.
    BlockTitle {
        /// Stage index.
        stage: usize,
        /// Block index within the stage.
        block: usize,
    },
    /// Column headers of a block table.
    Header,
    /// Data row `offset` of `stages[stage].blocks[block]`.
    Data {
        /// Stage index.
        stage: usize,
        /// Block index within the stage.
        block: usize,
        /// Zero-based row within the block.
        offset: usize,
        /// Whether this is the block's last data row.
        last: bool,
    },
}

/// The plan: one [`RowKind`] per sheet row, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    rows: Vec<RowKind>,
}

impl OutputLayout {
    /// Plans the sheet for `stages`.
    pub fn plan(stages: &[StageSection]) -> Self {
        let mut rows = vec![RowKind::Blank; LEADING_BLANK_ROWS];
        rows.push(RowKind::Title);
        rows.push(RowKind::Blank);

        for (s, stage) in stages.iter().enumerate() {
            if s > 0 {
                rows.extend([RowKind::Blank, RowKind::Blank]);
            }
            if !stage.title.is_empty() {
                rows.push(RowKind::StageTitle { stage: s });
                rows.push(RowKind::Blank);
            }
            for (b, block) in stage.blocks.iter().enumerate() {
                if b > 0 {
                    rows.push(RowKind::Blank);
                }
                rows.push(RowKind::BlockTitle { stage: s, block: b });
                rows.push(RowKind::Blank);
                rows.push(RowKind::Header);
                let n = block.rows.len();
                rows.extend((0..n).map(|offset| RowKind::Data {
                    stage: s,
                    block: b,
                    offset,
                    last: offset + 1 == n,
                }));
            }
        }
        Self { rows }
    }

    /// Row kinds, indexed by zero-based sheet row.
    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    /// Number of planned rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` for an empty plan.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zero-based sheet row of the first row of `kind`, if planned.
    pub fn position(&self, kind: RowKind) -> Option<usize> {
        self.rows.iter().position(|r| *r == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::table::Cell;

    fn block(title: &str, n: usize) -> BlockSection {
        BlockSection {
            title: title.to_owned(),
            rows: vec![vec![Cell::Blank]; n],
        }
    }

    #[test]
    fn two_stages_layout() {
        let stages = [
            StageSection {
                title: "ETAPA 01".to_owned(),
                blocks: vec![block("BLOCO 01", 2), block("BLOCO 02", 1)],
            },
            StageSection {
                title: "ETAPA 02".to_owned(),
                blocks: vec![block("QUADRA 02", 1)],
            },
        ];
        let layout = OutputLayout::plan(&stages);
        use RowKind::{Blank, BlockTitle, Data, Header, StageTitle, Title};
        let expected = vec![
            Blank,
            Blank,
            Title,
            Blank,
            StageTitle { stage: 0 },
            Blank,
            BlockTitle { stage: 0, block: 0 },
            Blank,
            Header,
            Data { stage: 0, block: 0, offset: 0, last: false },
            Data { stage: 0, block: 0, offset: 1, last: true },
            Blank,
            BlockTitle { stage: 0, block: 1 },
            Blank,
            Header,
            Data { stage: 0, block: 1, offset: 0, last: true },
            Blank,
            Blank,
            StageTitle { stage: 1 },
            Blank,
            BlockTitle { stage: 1, block: 0 },
            Blank,
            Header,
            Data { stage: 1, block: 0, offset: 0, last: true },
        ];
        assert_eq!(layout.rows(), expected.as_slice());
    }

    #[test]
    fn untitled_stage_has_no_band() {
        let stages = [StageSection {
            title: String::new(),
            blocks: vec![block("QUADRA 01", 1)],
        }];
        let layout = OutputLayout::plan(&stages);
        assert_eq!(layout.position(RowKind::StageTitle { stage: 0 }), None);
        assert_eq!(
            layout.position(RowKind::BlockTitle { stage: 0, block: 0 }),
            Some(4)
        );
    }
}
