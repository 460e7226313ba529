//! ERP unit import: one `;`-separated line per unit.
use imobi_core::{
    AreaRule, ClassifierVariant, ColumnConcept, PCD_SUFFIX, Record, StageSource, TransformError,
    area_label, format_currency_brl, format_fraction, ideal_fractions, is_pcd, normalize_display,
    numeric_or_warn, parse_area, text_label, unit_code,
};

use super::{Context, OutputFormat, TransformOutput};
use crate::export::csv::{SIENGE_UNIT_HEADER, guard, sanitize, write_csv};

/// Block identifier as the ERP expects it: the two-digit block number, or
/// the block text when it has none.
fn block_id(record: &Record) -> String {
    record
        .block
        .numeric
        .map_or_else(|| normalize_display(&record.block.original), |n| format!("{n:02}"))
}

fn unit_id(record: &Record) -> String {
    let mut unit = unit_code(record);
    if is_pcd(record) {
        unit.push_str(PCD_SUFFIX);
    }
    unit
}

pub(super) fn run(ctx: &mut Context<'_>) -> Result<TransformOutput, TransformError> {
    let groups = ctx.classify_and_group(ClassifierVariant::BlockOnly, StageSource::Classifier)?;
    let area = ctx.area_concept().unwrap_or(ColumnConcept::PrivateArea);

    let mut lines: Vec<Vec<String>> = Vec::new();
    for group in &groups {
        let records: Vec<&Record> = group.records().collect();
        let areas: Vec<Option<f64>> = records
            .iter()
            .map(|r| parse_area(r.get(area), AreaRule::Plain, r.row, &mut ctx.diagnostics))
            .collect();
        let fractions = ideal_fractions(&areas);
        for ((record, area), fraction) in records.iter().zip(&areas).zip(fractions) {
            let value = numeric_or_warn(
                record.get(ColumnConcept::Value),
                ColumnConcept::Value,
                record.row,
                &mut ctx.diagnostics,
            );
            lines.push(vec![
                guard(&block_id(record)),
                sanitize(&unit_id(record)),
                sanitize(&text_label(record.get(ColumnConcept::Type))),
                guard(&area_label(*area)),
                format_fraction(fraction, 9),
                value.map_or_else(String::new, format_currency_brl),
            ]);
        }
    }

    ctx.emit(OutputFormat::Csv, || write_csv(&SIENGE_UNIT_HEADER, &lines))
}
