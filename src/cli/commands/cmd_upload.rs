use crate::cli::commands::validator_is_file;
use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("upload")
        .about("Upload a file to a product")
        .arg(
            Arg::new("product")
                .help("Product id")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("file")
                .help("/path/to/file")
                .required(true)
                .value_parser(validator_is_file())
                .num_args(1),
        )
}
