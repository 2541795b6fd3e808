use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("output")
        .about("Create an output for a variant")
        .arg(
            Arg::new("variant")
                .help("Variant id")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("type")
                .help("Output type, example: RFA, IFC")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("representation")
                .help("Representation of the output")
                .long("representation")
                .short('r')
                .num_args(1),
        )
        .arg(
            Arg::new("version")
                .help("Engine version, example: 2025")
                .long("version")
                .num_args(1),
        )
        .arg(
            Arg::new("no-wait")
                .help("Print the output id and return without waiting")
                .long("no-wait")
                .num_args(0),
        )
}
