pub use taskboard_core::config::*;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(cli.api_url.clone(), cli.data_dir.clone())
}
