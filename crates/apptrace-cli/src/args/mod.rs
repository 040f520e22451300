mod commands;

pub use commands::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "apptrace")]
#[command(about = "Append and inspect file-backed trace events", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}
