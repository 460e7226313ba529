//! The `imobi` binary.
use std::process::ExitCode;

use clap::Parser;
use imobi_core::{BlockedUnitsFilter, InstallmentParams, TransformParams};
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod format;
mod io;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;
use crate::format::FormatterConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet);
    init_tracing(&cli, config.colors);

    match dispatch(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            if let Err(write_err) = format::write_error(&mut handle, &e, &config) {
                tracing::error!("could not report failure: {write_err}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Logs to stderr. `RUST_LOG` wins over the flags.
fn init_tracing(cli: &Cli, colors: bool) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "off"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(colors)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already set");
    }
}

fn dispatch(cli: Cli, config: &FormatterConfig) -> Result<(), CliError> {
    let max = cli.max_file_size;
    match cli.command {
        Command::PriceTable {
            input,
            stages,
            stage_map,
        } => {
            let stage_map = cmd::transform::stage_map(&stages, stage_map.as_deref(), max)?;
            cmd::transform::run(TransformParams::PriceTable { stage_map }, &input, max, config)
        }
        Command::LotInstallments {
            input,
            months,
            annual_interest,
            years,
        } => {
            let params = InstallmentParams {
                months_until_first_installment: months,
                annual_interest_percent: annual_interest,
                installment_years: years,
            };
            cmd::transform::run(TransformParams::LotInstallments(params), &input, max, config)
        }
        Command::SiengeUnits { input } => {
            cmd::transform::run(TransformParams::SiengeUnits, &input, max, config)
        }
        Command::Incorporation { input } => {
            cmd::transform::run(TransformParams::Incorporation, &input, max, config)
        }
        Command::BlockedUnits {
            input,
            ignore_project,
            ignore_reason,
        } => {
            let filter = BlockedUnitsFilter {
                ignored_projects: ignore_project,
                ignored_reasons: ignore_reason,
            };
            cmd::transform::run(TransformParams::BlockedUnits(filter), &input, max, config)
        }
        Command::Facets {
            file,
            header_threshold,
        } => cmd::facets::run(&file, header_threshold, max, cli.format),
    }
}
