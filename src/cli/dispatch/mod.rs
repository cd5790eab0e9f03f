use crate::cli::actions::{seed, server, Action};
use anyhow::{Context, Result};
use clap::parser::ValueSource;

/// Connection string variable honoured when neither `--dsn` nor
/// `PIZZERIA_DSN` is given.
pub const FALLBACK_DSN_ENV: &str = "DB_URI";

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("seed", sub_m)) => Ok(Action::Seed(seed::Args { dsn: dsn(sub_m)? })),
        _ => {
            let port = matches.get_one::<u16>("port").copied().unwrap_or(5555);
            Ok(Action::Server(server::Args {
                port,
                dsn: dsn(matches)?,
            }))
        }
    }
}

fn dsn(matches: &clap::ArgMatches) -> Result<String> {
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    if matches.value_source("dsn") == Some(ValueSource::DefaultValue) {
        if let Ok(uri) = std::env::var(FALLBACK_DSN_ENV) {
            if !uri.trim().is_empty() {
                return Ok(uri);
            }
        }
    }

    Ok(dsn)
}
