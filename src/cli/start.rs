use crate::{
    api::Api,
    cli::{Config, actions::Action, commands, dispatch, globals::GlobalArgs},
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::{
    fs,
    path::{Path, PathBuf},
    process::exit,
};

/// # Errors
///
/// Will return `Err` if the config directory can not be created
pub fn get_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().map_or_else(|| PathBuf::from("/tmp"), |h| h);

    let config_path = Path::new(&home_dir).join(".config").join("ind");
    fs::create_dir_all(&config_path)
        .context(format!("unable to create: {}", &config_path.display()))?;

    Ok(config_path)
}

/// # Errors
///
/// Will return `Err` if the config file can not be loaded or the arguments do
/// not make an action
pub fn start() -> Result<(Api, Action, GlobalArgs)> {
    let config_path = get_config_path()?;

    // start the command line interface
    let cmd = commands::new(&config_path);

    // get the matches
    let matches = cmd.get_matches();

    let verbosity_level = match matches.get_one::<u8>("verbose").copied().unwrap_or(0) {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(verbosity_level)
        .init();

    log::info!("config path: {}", config_path.display());

    // Config file is required
    let config_file: PathBuf = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .context("no config file found")?;

    // load the config file
    let config = Config::new(config_file)?;

    let api = config.api()?;

    log::debug!("api:\n{api}");

    // show config
    if matches.subcommand_matches("show").is_some() {
        println!("{api}");
        exit(0);
    }

    let global_args = global_args(&matches, &config);

    // create the action
    let action = dispatch::dispatch(&matches)?;

    log::debug!("globals: {global_args:#?}, action: {action:#?}");

    Ok((api, action, global_args))
}

// command line options over the config file
fn global_args(matches: &ArgMatches, config: &Config) -> GlobalArgs {
    let mut global_args = GlobalArgs::new();

    global_args.quiet = matches.get_one::<bool>("quiet").copied().unwrap_or(false);

    if let Some(number) = matches.get_one::<u8>("number") {
        global_args.max_requests = *number;
    }

    global_args.poll = config.poll.options();

    if let Some(attempts) = matches.get_one::<u32>("attempts") {
        global_args.set_attempts(*attempts);
    }

    global_args.set_timeout(matches.get_one::<u64>("timeout").copied().unwrap_or(0));

    log::info!(
        "max requests: {}, max attempts: {}",
        global_args.max_requests,
        global_args.poll.max_attempts
    );

    global_args
}
