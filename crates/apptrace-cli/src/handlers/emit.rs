use anyhow::{Result, bail};
use apptrace_core::TraceSession;
use apptrace_core::env::TRACE_ENABLED_ENV;
use serde_json::{Map, Value};

pub fn handle(event_type: &str, raw_details: &[String], command_name: &str) -> Result<()> {
    let details = parse_details(raw_details)?;

    let mut session = TraceSession::from_env(command_name);
    if !session.enabled() {
        eprintln!("Tracing is disabled; set {}=1 to record events", TRACE_ENABLED_ENV);
        return Ok(());
    }

    session.emit(event_type, Some(details));

    if let Some(store) = session.store() {
        println!("Recorded {} -> {}", event_type, store.path().display());
    }
    Ok(())
}

/// Parse `KEY=VALUE` pairs. Values are tried as JSON first so numbers,
/// booleans, and nested structures survive; anything else stays a string.
fn parse_details(raw_details: &[String]) -> Result<Map<String, Value>> {
    let mut details = Map::new();
    for raw in raw_details {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("invalid detail {:?}: expected KEY=VALUE", raw);
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        details.insert(key.to_string(), value);
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_values_parse_as_json_first() {
        let details = parse_details(&[
            "count=3".to_string(),
            "ready=true".to_string(),
            "name=alpha".to_string(),
        ])
        .unwrap();

        assert_eq!(details["count"], 3);
        assert_eq!(details["ready"], true);
        assert_eq!(details["name"], "alpha");
    }

    #[test]
    fn test_detail_without_separator_is_rejected() {
        assert!(parse_details(&["no-separator".to_string()]).is_err());
    }
}
