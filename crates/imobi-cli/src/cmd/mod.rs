//! Command modules for the `imobi` CLI.
//!
//! Each submodule implements one family of subcommands. Its `run` function
//! takes the parsed arguments and returns `Ok(())` on success or a
//! [`crate::error::CliError`] on failure.
pub mod facets;
pub mod transform;
