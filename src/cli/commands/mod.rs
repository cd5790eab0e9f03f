pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const DEFAULT_PORT: &str = "5555";
pub const DEFAULT_DSN: &str = "sqlite://app.db?mode=rwc";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("pizzeria")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value(DEFAULT_PORT)
                .env("PIZZERIA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .long_help(
                    "Database connection string, example: sqlite://app.db?mode=rwc. `mode=rwc` creates the file when missing. When neither this flag nor PIZZERIA_DSN is set, DB_URI is used if present.",
                )
                .default_value(DEFAULT_DSN)
                .env("PIZZERIA_DSN")
                .global(true),
        )
        .subcommand(
            Command::new("seed")
                .about("Replace the database contents with sample restaurants and pizzas"),
        );

    logging::with_args(command)
}
