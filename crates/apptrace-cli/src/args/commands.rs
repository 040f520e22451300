use crate::types::OutputFormat;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Append one trace event to the trace file")]
    Emit {
        #[arg(help = "Event type tag, e.g. NODE_INIT or RECONCILE_STEP")]
        event_type: String,

        #[arg(
            long = "detail",
            value_name = "KEY=VALUE",
            help = "Detail entry; VALUE parses as JSON, falling back to a plain string"
        )]
        details: Vec<String>,

        #[arg(
            long,
            default_value = "emit",
            help = "Command name used when synthesizing session identifiers"
        )]
        command_name: String,
    },

    #[command(about = "Show recorded trace events")]
    Show {
        #[arg(long, help = "Trace file to read (defaults to the environment path)")]
        path: Option<PathBuf>,

        #[arg(long, help = "Only show events of this type")]
        event_type: Option<String>,

        #[arg(long, help = "Only show the most recent N events")]
        limit: Option<usize>,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}
