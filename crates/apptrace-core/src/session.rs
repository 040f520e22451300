use std::sync::Arc;

use apptrace_types::{DETAIL_RECONCILE_ID, DETAIL_STEP_SEQ, DETAIL_TRACE_ID, TraceEvent};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::env;
use crate::store::TraceStore;

/// Per-invocation recording context: carries the identifiers stamped onto
/// every event and the step sequence counter.
///
/// One session belongs to exactly one logical execution path; the counter
/// is unsynchronized on purpose. Concurrency happens at the store, not
/// here.
#[derive(Debug)]
pub struct TraceSession {
    enabled: bool,
    store: Option<Arc<TraceStore>>,
    reconcile_id: String,
    trace_id: String,
    step_seq: u64,
}

impl TraceSession {
    /// Resolve a session from the environment for one command invocation.
    ///
    /// Disabled unless `COCKROACH_APP_TRACE_ENABLED` holds a truthy token.
    /// Identifier overrides come from the environment; otherwise both IDs
    /// are synthesized from the command name and a single epoch-nanosecond
    /// wall-clock read. Never fails: malformed values degrade to defaults.
    pub fn from_env(command_name: &str) -> Self {
        let enabled = std::env::var(env::TRACE_ENABLED_ENV)
            .map(|value| env::parse_bool_env(&value))
            .unwrap_or(false);
        if !enabled {
            return Self::disabled();
        }

        let now_nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let reconcile_id = env::id_override(env::RECONCILE_ID_ENV)
            .unwrap_or_else(|| format!("app/{command_name}#{now_nanos}"));
        let trace_id = env::id_override(env::TRACE_ID_ENV)
            .unwrap_or_else(|| format!("app/{command_name}-{now_nanos}"));

        Self::new(
            TraceStore::shared(env::resolve_trace_path()),
            reconcile_id,
            trace_id,
        )
    }

    /// An enabled session writing through the given store.
    pub fn new(
        store: Arc<TraceStore>,
        reconcile_id: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            store: Some(store),
            reconcile_id: reconcile_id.into(),
            trace_id: trace_id.into(),
            step_seq: 1,
        }
    }

    /// A session whose every emit is a no-op.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            store: None,
            reconcile_id: String::new(),
            trace_id: String::new(),
            step_seq: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn store(&self) -> Option<&Arc<TraceStore>> {
        self.store.as_ref()
    }

    pub fn reconcile_id(&self) -> &str {
        &self.reconcile_id
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record one event. Best-effort: a store failure is reported as a
    /// stderr warning and swallowed, so tracing can never change the host
    /// command's outcome.
    ///
    /// The identifier keys are filled in only when the caller did not
    /// supply them, and the step counter ticks only when `stepSeq` was
    /// actually inserted — a caller-provided `stepSeq` consumes no tick.
    pub fn emit(&mut self, event_type: &str, details: Option<Map<String, Value>>) {
        if !self.enabled {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };

        let mut details = details.unwrap_or_default();
        if !details.contains_key(DETAIL_RECONCILE_ID) {
            details.insert(
                DETAIL_RECONCILE_ID.to_string(),
                Value::from(self.reconcile_id.clone()),
            );
        }
        if !details.contains_key(DETAIL_TRACE_ID) {
            details.insert(
                DETAIL_TRACE_ID.to_string(),
                Value::from(self.trace_id.clone()),
            );
        }
        if !details.contains_key(DETAIL_STEP_SEQ) {
            details.insert(DETAIL_STEP_SEQ.to_string(), Value::from(self.step_seq));
            self.step_seq += 1;
        }

        let event = TraceEvent::new(event_type, details);
        if let Err(err) = store.append(event) {
            eprintln!("Warning: failed to append trace event {event_type:?}: {err}");
        }
    }
}
