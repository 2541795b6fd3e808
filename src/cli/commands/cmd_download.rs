use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("download")
        .about("Print the download URL of an output")
        .arg(
            Arg::new("output")
                .help("Output id")
                .required(true)
                .num_args(1),
        )
}
