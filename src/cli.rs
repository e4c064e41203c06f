use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "proxyopt")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Reverse-proxy health evaluation and automatic upstream selection")]
pub struct Cli {
    /// Settings file (defaults to ~/.proxyopt/settings.toml)
    #[arg(short = 's', long = "settings")]
    pub settings: Option<PathBuf>,

    /// Override the target JSON config file
    #[arg(short = 'f', long = "config-file")]
    pub config_file: Option<PathBuf>,

    /// Write a default settings file
    #[arg(short = 'i', long = "init")]
    pub init: bool,

    /// Print effective settings
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Validate settings and exit
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Evaluate and select without writing the config file
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Skip the WeCom notification
    #[arg(long = "no-notify")]
    pub no_notify: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
