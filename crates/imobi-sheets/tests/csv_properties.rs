//! Property tests for the ERP CSV writer: arbitrary free text never breaks
//! the record layout.
#![allow(clippy::expect_used)]

use imobi_sheets::export::csv::{SIENGE_UNIT_HEADER, guard, sanitize, write_csv};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sanitized_text_has_no_separators(s in ".{0,40}") {
        let out = sanitize(&s);
        prop_assert!(!out.contains([';', '"', '\r', '\n']));
    }

    #[test]
    fn guarded_text_is_one_formula(s in ".{0,40}") {
        let out = guard(&s);
        prop_assert!(out.starts_with("=\"") && out.ends_with('"'));
        prop_assert_eq!(out.matches('"').count(), 2);
    }

    #[test]
    fn rows_reread_with_six_fields(
        rows in prop::collection::vec(prop::collection::vec(".{0,12}", 6), 1..8)
    ) {
        let lines: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|f| sanitize(f)).collect())
            .collect();
        let bytes = write_csv(&SIENGE_UNIT_HEADER, &lines).expect("write");
        let body = bytes.strip_prefix(b"\xEF\xBB\xBF").expect("BOM");
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .quoting(false)
            .from_reader(body);
        let reread: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("reread");
        prop_assert_eq!(reread.len(), lines.len());
        prop_assert!(reread.iter().all(|r| r.len() == 6));
    }
}
