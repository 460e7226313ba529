//! Styled price table grouped by stage and block.
use imobi_core::{
    AreaRule, ClassifierVariant, ColumnConcept, Diagnostics, Record, StageMap, StageSource,
    TransformError, area_label, garage_label, normalize_display, numeric_or_warn, parse_area,
    text_label, unit_name,
};

use super::{Context, OutputFormat, TransformOutput, block_title};
use crate::export::layout::{BlockSection, StageSection};
use crate::export::price_table::{PRICE_TABLE_TITLE, write_sectioned_workbook};
use crate::export::table::{Cell, Column, Row};

const SHEET_NAME: &str = "TABELA";

/// One output column of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Unit,
    Type,
    Area(ColumnConcept),
    Yard,
    Garage,
    Value,
}

impl Field {
    fn column(self) -> Column {
        match self {
            Self::Unit => Column::text("UNIDADE", 10.0),
            Self::Type => Column::text("TIPO", 45.0),
            Self::Area(_) => Column::text("ÁREA", 18.0),
            Self::Yard => Column::text("QUINTAL", 12.0),
            Self::Garage => Column::text("GARAGEM", 15.0),
            Self::Value => Column::currency("VALOR", 20.0),
        }
    }

    fn cell(self, record: &Record, diagnostics: &mut Diagnostics) -> Cell {
        match self {
            Self::Unit => Cell::text(unit_name(record)),
            Self::Type => Cell::text(text_label(record.get(ColumnConcept::Type))),
            Self::Area(concept) => Cell::text(area_label(parse_area(
                record.get(concept),
                AreaRule::Plain,
                record.row,
                diagnostics,
            ))),
            Self::Yard => Cell::text(area_label(parse_area(
                record.get(ColumnConcept::Yard),
                AreaRule::Plain,
                record.row,
                diagnostics,
            ))),
            Self::Garage => Cell::text(garage_label(record.get(ColumnConcept::Garage))),
            Self::Value => Cell::currency(numeric_or_warn(
                record.get(ColumnConcept::Value),
                ColumnConcept::Value,
                record.row,
                diagnostics,
            )),
        }
    }
}

/// Columns in output order; optional ones only when their concept is bound.
fn fields(ctx: &Context<'_>) -> Vec<Field> {
    let mut fields = vec![Field::Unit];
    if ctx.map.contains(ColumnConcept::Type) {
        fields.push(Field::Type);
    }
    if let Some(concept) = ctx.area_concept() {
        fields.push(Field::Area(concept));
    }
    if ctx.map.contains(ColumnConcept::Yard) {
        fields.push(Field::Yard);
    }
    if ctx.map.contains(ColumnConcept::Garage) {
        fields.push(Field::Garage);
    }
    fields.push(Field::Value);
    fields
}

pub(super) fn run(
    ctx: &mut Context<'_>,
    stage_map: Option<&StageMap>,
) -> Result<TransformOutput, TransformError> {
    let variant = ClassifierVariant::StageAware {
        stage_from_map: stage_map.is_some(),
    };
    let source = stage_map.map_or(StageSource::Classifier, StageSource::Map);
    let groups = ctx.classify_and_group(variant, source)?;

    let fields = fields(ctx);
    let columns: Vec<Column> = fields.iter().map(|f| f.column()).collect();
    let mut stages = Vec::with_capacity(groups.len());
    for group in &groups {
        let blocks = group
            .blocks
            .iter()
            .map(|block| BlockSection {
                title: block_title(&block.key),
                rows: block
                    .records
                    .iter()
                    .map(|r| -> Row {
                        fields
                            .iter()
                            .map(|f| f.cell(r, &mut ctx.diagnostics))
                            .collect()
                    })
                    .collect(),
            })
            .collect();
        stages.push(StageSection {
            title: normalize_display(&group.key),
            blocks,
        });
    }

    ctx.emit(OutputFormat::Xlsx, || {
        write_sectioned_workbook(SHEET_NAME, PRICE_TABLE_TITLE, &columns, &stages)
    })
}
