//! Normalized incorporation registry.
//!
//! The registry is a single stage: computed ideal fractions share the whole
//! sheet's area. A sheet that already carries fractions keeps them, re-emitted
//! with nine decimals.
use imobi_core::{
    AreaRule, ClassifierVariant, ColumnConcept, Record, StageSource, TransformError, area_label,
    format_fraction, garage_label, ideal_fractions, numeric_or_warn, parse_area, unit_name,
};

use super::{Context, OutputFormat, TransformOutput, block_title};
use crate::export::table::{Cell, Column, Row, write_table_workbook};

const SHEET_NAME: &str = "INCORPORACAO";

fn columns() -> [Column; 5] {
    [
        Column::text("UNIDADE", 22.0),
        Column::text("BLOCO", 14.0),
        Column::text("ÁREA PRIVATIVA", 18.0),
        Column::text("VAGAS", 12.0),
        Column::text("FRAÇÃO IDEAL", 16.0),
    ]
}

pub(super) fn run(ctx: &mut Context<'_>) -> Result<TransformOutput, TransformError> {
    let groups = ctx.classify_and_group(ClassifierVariant::BlockOnly, StageSource::Classifier)?;
    let area = ctx.area_concept().unwrap_or(ColumnConcept::PrivateArea);
    let given_fractions = ctx.map.contains(ColumnConcept::IdealFraction);

    let records: Vec<&Record> = groups.iter().flat_map(|g| g.records()).collect();
    let areas: Vec<Option<f64>> = records
        .iter()
        .map(|r| parse_area(r.get(area), AreaRule::Plain, r.row, &mut ctx.diagnostics))
        .collect();
    let computed = ideal_fractions(&areas);

    let mut rows: Vec<Row> = Vec::with_capacity(records.len());
    for ((record, area), computed) in records.iter().zip(&areas).zip(computed) {
        let fraction = if given_fractions {
            numeric_or_warn(
                record.get(ColumnConcept::IdealFraction),
                ColumnConcept::IdealFraction,
                record.row,
                &mut ctx.diagnostics,
            )
        } else {
            Some(computed)
        };
        let garage = record.raw(ColumnConcept::Garage).map(garage_label);
        rows.push(vec![
            Cell::text(unit_name(record)),
            Cell::text(block_title(&record.block)),
            Cell::text(area_label(*area)),
            Cell::text(garage.unwrap_or_default()),
            Cell::text(fraction.map(|f| format_fraction(f, 9)).unwrap_or_default()),
        ]);
    }

    ctx.emit(OutputFormat::Xlsx, || write_table_workbook(SHEET_NAME, &columns(), &rows))
}
