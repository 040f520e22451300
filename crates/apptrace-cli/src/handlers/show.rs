use crate::types::OutputFormat;
use anyhow::Result;
use apptrace_core::{TraceStore, env::resolve_trace_path};
use apptrace_types::TraceEvent;
use chrono::SecondsFormat;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn handle(
    path: Option<PathBuf>,
    event_type: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let path = path.unwrap_or_else(resolve_trace_path);
    let store = TraceStore::new(&path);

    let mut events = store.read()?.events;
    if let Some(event_type) = event_type {
        events.retain(|e| e.event_type == event_type);
    }
    if let Some(limit) = limit
        && events.len() > limit
    {
        events.drain(..events.len() - limit);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        OutputFormat::Plain => {
            if events.is_empty() {
                println!("No trace events at {}", path.display());
                return Ok(());
            }
            let use_color = std::io::stdout().is_terminal();
            for event in &events {
                print_event(event, use_color);
            }
        }
    }
    Ok(())
}

fn print_event(event: &TraceEvent, use_color: bool) {
    let time = event.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let details = serde_json::to_string(&event.details).unwrap_or_default();

    if use_color {
        println!(
            "{} {} {}",
            time.dimmed(),
            event.event_type.bold(),
            details.dimmed()
        );
    } else {
        println!("{} {} {}", time, event.event_type, details);
    }
}
