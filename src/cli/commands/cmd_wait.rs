use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("wait")
        .about("Wait until an output is ready and print its download URL")
        .arg(
            Arg::new("output")
                .help("Output id")
                .required(true)
                .num_args(1),
        )
}
