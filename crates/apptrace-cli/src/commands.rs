use super::args::{Cli, Commands};
use super::handlers;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Emit {
            event_type,
            details,
            command_name,
        } => handlers::emit::handle(&event_type, &details, &command_name),

        Commands::Show {
            path,
            event_type,
            limit,
            format,
        } => handlers::show::handle(path, event_type.as_deref(), limit, format),
    }
}
