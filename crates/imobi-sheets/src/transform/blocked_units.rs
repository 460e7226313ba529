//! Filtered blocked-units report.
use imobi_core::{
    BlockedUnitsFilter, PipelineState, TransformError, collect_blocked_units, text_label,
};

use super::{Context, OutputFormat, TransformOutput};
use crate::export::table::{Cell, Column, Row, write_table_workbook};

const SHEET_NAME: &str = "BLOQUEADAS";

fn columns() -> [Column; 4] {
    [
        Column::text("EMPREENDIMENTO", 40.0),
        Column::text("UNIDADE", 14.0),
        Column::text("MOTIVO", 40.0),
        Column::text("DATA BLOQUEIO", 18.0),
    ]
}

pub(super) fn run(
    ctx: &mut Context<'_>,
    filter: &BlockedUnitsFilter,
) -> Result<TransformOutput, TransformError> {
    let units = collect_blocked_units(&ctx.scanned, &ctx.map);
    ctx.tracker.advance(PipelineState::Classified);
    let total = units.len();
    let kept = filter.apply(units, &mut ctx.diagnostics)?;
    ctx.tracker.advance(PipelineState::Grouped);
    tracing::debug!(total, kept = kept.len(), "blocked units filtered");

    let rows: Vec<Row> = kept
        .iter()
        .map(|u| {
            vec![
                Cell::text(text_label(&u.project)),
                Cell::text(text_label(&u.unit)),
                Cell::text(text_label(&u.reason)),
                Cell::text(text_label(&u.blocked_at)),
            ]
        })
        .collect();

    ctx.emit(OutputFormat::Xlsx, || write_table_workbook(SHEET_NAME, &columns(), &rows))
}
