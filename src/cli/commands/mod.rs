pub mod cmd_download;
pub mod cmd_output;
pub mod cmd_outputs;
pub mod cmd_show;
pub mod cmd_upload;
pub mod cmd_wait;

use crate::upload::session::MAX_CONCURRENCY;
use clap::{
    Arg, ColorChoice, Command,
    builder::ValueParser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::{
    cmp, fs,
    path::{Path, PathBuf},
};

pub fn validator_is_file() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<PathBuf, String> {
        if let Ok(metadata) = fs::metadata(s) {
            if metadata.is_file() {
                return Ok(PathBuf::from(s));
            }
        }

        Err(format!("Invalid file path or file does not exist: '{s}'"))
    })
}

/// Default number of concurrent chunk transfers.
#[must_use]
pub fn default_requests() -> usize {
    // num_cpus::get_physical() - 2, at least 1
    cmp::min(
        num_cpus::get_physical().saturating_sub(2).max(1),
        MAX_CONCURRENCY,
    )
}

pub fn new(config_path: &Path) -> Command {
    // get config file path (default: ~/.config/ind/config.yml)
    let config_file_path = config_path.join("config.yml");

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let num_requests = default_requests().to_string();

    Command::new("ind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Upload payloads and wait on outputs of the Informed Design API")
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("quiet")
            .long("quiet")
            .short('q')
            .help("Don't show progress bar or spinner")
            .global(true)
            .num_args(0)
        )
        .arg(
            Arg::new("config")
            .default_value(config_file_path.into_os_string())
            .long("config")
            .num_args(1)
            .short('c')
            .global(true)
            .value_parser(validator_is_file())
            .value_name("config.yml")
        )
        .arg(
            Arg::new("verbose")
            .help("Verbosity level")
            .short('v')
            .long("verbose")
            .global(true)
            .action(clap::ArgAction::Count)
        )
        .arg(
            Arg::new("number")
            .help("Number of max concurrent chunk uploads")
            .short('n')
            .long("number")
            .default_value(num_requests)
            .value_parser(clap::value_parser!(u8).range(1..=8))
            .global(true)
            .num_args(1)
        )
        .arg(
            Arg::new("attempts")
            .help("Max status queries while waiting on an output, overrides the config file")
            .long("attempts")
            .value_parser(clap::value_parser!(u32).range(1..))
            .global(true)
            .num_args(1)
        )
        .arg(
            Arg::new("timeout")
            .help("Give up after this many seconds, 0 to disable")
            .long("timeout")
            .short('t')
            .default_value("0")
            .value_name("seconds")
            .value_parser(clap::value_parser!(u64))
            .global(true)
            .num_args(1)
        )
        .subcommand(cmd_upload::command())
        .subcommand(cmd_output::command())
        .subcommand(cmd_outputs::command())
        .subcommand(cmd_wait::command())
        .subcommand(cmd_download::command())
        .subcommand(cmd_show::command())
}
