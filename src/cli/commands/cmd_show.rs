use clap::Command;

pub fn command() -> Command {
    Command::new("show").about("Show the API root, access context and token expiry")
}
