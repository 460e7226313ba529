//! Spreadsheet and CSV front and back ends for the imobi pipeline.
//!
//! This crate turns input bytes into an [`imobi_core::RawTable`], runs the
//! normalization pipeline of `imobi-core` and writes the result. The
//! `calamine`, `rust_xlsxwriter` and `csv` dependencies are confined to this
//! crate and do not bleed into `imobi-core` or `imobi-cli`.
//!
//! # Transforms
//!
//! | Kind | Output |
//! |---|---|
//! | `price-table` | styled workbook grouped by stage and block |
//! | `lot-installments` | styled lot workbook with one monthly column per year |
//! | `sienge-units` | `;`-separated ERP import with a UTF-8 BOM |
//! | `incorporation` | plain workbook with ideal fractions |
//! | `blocked-units` | plain workbook of rows surviving the filters |
//!
//! Every transform is all-or-nothing: [`run_transform`] returns bytes only
//! when the whole artifact was written.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod csv_input;
pub mod error;
pub mod export;
pub mod input;
pub mod sheet;
pub mod transform;

pub use error::EmitError;
pub use input::{InputFormat, read_table};
pub use transform::{OutputFormat, TransformOutput, blocked_unit_facets, run_transform};
