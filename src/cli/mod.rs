mod config;
pub use self::config::{Config, PollConfig};

pub mod actions;
pub mod globals;
pub mod progressbar;

mod start;
pub use self::start::{get_config_path, start};

mod commands;
mod dispatch;
