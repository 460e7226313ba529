//! Integration tests for the transform and facets subcommands.
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path to the compiled `imobi` binary.
fn imobi_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("imobi");
    path
}

fn imobi(args: &[&str]) -> Output {
    Command::new(imobi_bin())
        .args(["--no-color"])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("IMOBI_MAX_FILE_SIZE")
        .env_remove("NO_COLOR")
        .output()
        .expect("run imobi")
}

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write input");
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("UTF-8 path")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const UNITS: &str = "\
BLOCO;UNIDADE;TIPO;ÁREA PRIVATIVA;VALOR
1;101;2Q;50,00;200000
;102;2Q PCD;150,00;sob consulta
";

const BLOCKED: &str = "\
EMPREENDIMENTO;UNIDADE;MOTIVO;DATA BLOQUEIO
Residencial Ipê;101;Permuta;01/02/2024
Jardim Sul;5;;
";

#[test]
fn sienge_units_writes_output_file_and_exits_0() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "units.csv", UNITS);
    let output = dir.path().join("units-sienge.csv");
    let out = imobi(&["sienge-units", arg(&input), "--output", arg(&output)]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let bytes = std::fs::read(&output).expect("output written");
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes).expect("UTF-8");
    assert!(text.contains(";APT 101;"));
    assert!(text.contains(";APT 102 (PCD);"));
    assert!(out.stdout.is_empty());
}

#[test]
fn sienge_units_reports_diagnostics_on_stderr() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "units.csv", UNITS);
    let out = imobi(&["sienge-units", arg(&input)]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(out.stdout.starts_with(b"\xEF\xBB\xBF"));
    let err = stderr(&out);
    assert!(err.contains("[W] row 3:"), "stderr: {err}");
    assert!(err.contains("sienge-units:"), "stderr: {err}");
}

#[test]
fn json_format_prints_ndjson_diagnostics() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "units.csv", UNITS);
    let output = dir.path().join("out.csv");
    let out = imobi(&["--format", "json", "sienge-units", arg(&input), "-o", arg(&output)]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let lines: Vec<serde_json::Value> = stderr(&out)
        .lines()
        .map(|l| serde_json::from_str(l).expect("NDJSON line"))
        .collect();
    let last = lines.last().expect("summary line");
    assert_eq!(last["summary"]["kind"], "sienge-units");
    assert!(lines.iter().any(|v| v["code"] == "not_numeric"));
}

#[test]
fn quiet_prints_nothing_on_success() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "units.csv", UNITS);
    let output = dir.path().join("out.csv");
    let out = imobi(&["-q", "sienge-units", arg(&input), "-o", arg(&output)]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stderr.is_empty(), "stderr: {}", stderr(&out));
}

#[test]
fn missing_file_exits_2() {
    let out = imobi(&["incorporation", "/nonexistent/registro.xlsx"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("file not found"));
}

#[test]
fn file_over_size_limit_exits_2() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "units.csv", UNITS);
    let out = imobi(&["--max-file-size", "16", "sienge-units", arg(&input)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("file too large"));
}

#[test]
fn missing_value_column_exits_2_without_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(
        dir.path(),
        "list.csv",
        "UNIDADE;TIPO;ÁREA\n1;2Q;50\n",
    );
    let output = dir.path().join("tabela.xlsx");
    let out = imobi(&["price-table", arg(&input), "--output", arg(&output)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("ColumnNotFound"), "stderr: {}", stderr(&out));
    assert!(!output.exists());
}

#[test]
fn price_table_with_stage_pairs_exits_0() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(
        dir.path(),
        "list.csv",
        "BLOCO;UNIDADE;TIPO;VALOR\nBLOCO 01;1;2Q;210000\n",
    );
    let output = dir.path().join("tabela.xlsx");
    let out = imobi(&[
        "price-table",
        arg(&input),
        "--stage",
        "BLOCO 01=ETAPA 01",
        "-o",
        arg(&output),
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let bytes = std::fs::read(&output).expect("workbook written");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn malformed_stage_pair_exits_1() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "list.csv", "UNIDADE;VALOR\n1;2\n");
    let out = imobi(&["price-table", arg(&input), "--stage", "BLOCO 01"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("invalid stage map"));
}

#[test]
fn zero_installment_years_exits_1() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "lots.csv", "QUADRA;LOTE;ÁREA;VALOR\n1;1;300;100000\n");
    let out = imobi(&[
        "lot-installments",
        arg(&input),
        "--months",
        "12",
        "--annual-interest",
        "10",
        "--years",
        "0",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("ParameterInvalid"));
}

#[test]
fn blocked_units_filtered_to_nothing_exits_1() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "blocked.csv", BLOCKED);
    let output = dir.path().join("bloqueadas.xlsx");
    let out = imobi(&[
        "blocked-units",
        arg(&input),
        "--ignore-project",
        "Residencial Ipê",
        "--ignore-reason",
        "<EMPTY>",
        "-o",
        arg(&output),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("EmptyAfterFilter"));
    assert!(!output.exists());
}

#[test]
fn facets_json_lists_projects_and_reasons() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "blocked.csv", BLOCKED);
    let out = imobi(&["--format", "json", "facets", arg(&input)]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("JSON object");
    assert_eq!(v["projects"], serde_json::json!(["JARDIM SUL", "RESIDENCIAL IPE"]));
    assert_eq!(v["reasons"], serde_json::json!(["<EMPTY>", "PERMUTA"]));
}
