use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("outputs")
        .about("List the outputs of a variant")
        .arg(
            Arg::new("variant")
                .help("Variant id")
                .required(true)
                .num_args(1),
        )
}
