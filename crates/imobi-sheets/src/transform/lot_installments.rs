//! Lot table with one monthly-installment column per year.
use imobi_core::{
    AreaRule, ClassifierVariant, ColumnConcept, DiagnosticCode, InstallmentParams, Record,
    StageSource, TransformError, area_label, format_currency_brl, normalize_display,
    numeric_or_warn, parse_area, unit_name,
};

use super::{Context, OutputFormat, TransformOutput, block_title};
use crate::export::layout::{BlockSection, StageSection};
use crate::export::price_table::{PRICE_TABLE_TITLE, write_sectioned_workbook};
use crate::export::table::{Cell, Column, Row};

const SHEET_NAME: &str = "LOTES";

fn columns(params: &InstallmentParams, with_entry: bool) -> Vec<Column> {
    let mut columns = vec![
        Column::text("LOTE", 10.0),
        Column::text("ÁREA", 18.0),
        Column::currency("VALOR", 20.0),
    ];
    if with_entry {
        columns.push(Column::currency("ENTRADA", 20.0));
    }
    columns.extend(
        (1..=params.installment_years)
            .map(|year| Column::currency(InstallmentParams::column_title(year), 20.0)),
    );
    columns
}

/// Formats one lot, or `None` when the entry leaves nothing to finance.
fn row(
    ctx: &mut Context<'_>,
    record: &Record,
    area: ColumnConcept,
    params: &InstallmentParams,
    with_entry: bool,
) -> Option<Row> {
    let diagnostics = &mut ctx.diagnostics;
    let lot_area = parse_area(record.get(area), AreaRule::Lot, record.row, diagnostics);
    let value = numeric_or_warn(
        record.get(ColumnConcept::Value),
        ColumnConcept::Value,
        record.row,
        diagnostics,
    );
    let entry = numeric_or_warn(
        record.get(ColumnConcept::Entry),
        ColumnConcept::Entry,
        record.row,
        diagnostics,
    );

    let schedule: Vec<Option<f64>> = match value {
        Some(value) => {
            let Some(schedule) = params.schedule(value, entry.unwrap_or(0.0)) else {
                diagnostics.warn(
                    DiagnosticCode::NothingToFinance,
                    Some(record.row),
                    format!(
                        "entry {} exceeds value {}; lot skipped",
                        format_currency_brl(entry.unwrap_or(0.0)),
                        format_currency_brl(value)
                    ),
                );
                return None;
            };
            schedule.into_iter().map(Some).collect()
        }
        None => vec![None; params.installment_years as usize],
    };

    let mut cells = vec![
        Cell::text(unit_name(record)),
        Cell::text(area_label(lot_area)),
        Cell::currency(value),
    ];
    if with_entry {
        cells.push(Cell::currency(entry));
    }
    cells.extend(schedule.into_iter().map(Cell::currency));
    Some(cells)
}

pub(super) fn run(
    ctx: &mut Context<'_>,
    params: &InstallmentParams,
) -> Result<TransformOutput, TransformError> {
    let groups = ctx.classify_and_group(ClassifierVariant::BlockOnly, StageSource::Classifier)?;
    let area = ctx.area_concept().unwrap_or(ColumnConcept::AreaBuilt);
    let with_entry = ctx.map.contains(ColumnConcept::Entry);

    let mut stages = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut blocks = Vec::with_capacity(group.blocks.len());
        for block in &group.blocks {
            let rows: Vec<Row> = block
                .records
                .iter()
                .filter_map(|r| row(ctx, r, area, params, with_entry))
                .collect();
            if rows.is_empty() {
                continue;
            }
            blocks.push(BlockSection {
                title: block_title(&block.key),
                rows,
            });
        }
        if !blocks.is_empty() {
            stages.push(StageSection {
                title: normalize_display(&group.key),
                blocks,
            });
        }
    }

    if stages.is_empty() {
        return Err(TransformError::EmptyAfterFilter);
    }

    let columns = columns(params, with_entry);
    ctx.emit(OutputFormat::Xlsx, || {
        write_sectioned_workbook(SHEET_NAME, PRICE_TABLE_TITLE, &columns, &stages)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_column_per_installment_year() {
        let params = InstallmentParams {
            months_until_first_installment: 60,
            annual_interest_percent: 10.0,
            installment_years: 3,
        };
        let titles: Vec<String> = columns(&params, true).into_iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            [
                "LOTE",
                "ÁREA",
                "VALOR",
                "ENTRADA",
                "PARCELA MENSAL ANO 1",
                "PARCELA MENSAL ANO 2",
                "PARCELA MENSAL ANO 3"
            ]
        );
        assert_eq!(columns(&params, false).len(), 6);
    }
}
