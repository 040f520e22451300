// NOTE: Recorder Architecture Rationale
//
// Why whole-document rewrite (not append-only lines)?
// - The trace file is a single human-readable JSON document consumed by
//   external tooling that expects one `events` array
// - Rewriting through a temp file + rename keeps the previous valid
//   document intact if the process dies mid-write
// - Trade-off: O(file) per append, acceptable at per-command event volume
//
// Why a store-owned lock (not a process global)?
// - Each TraceStore owns the mutex guarding its file, so tests can point
//   isolated instances at distinct temp paths
// - Sessions resolved from the environment share one store per path via
//   TraceStore::shared, which preserves in-process append serialization
//
// Why best-effort emit?
// - Tracing must never change the host command's outcome; store failures
//   are downgraded to a stderr warning at the session layer, by policy

pub mod classify;
pub mod env;
pub mod error;
pub mod session;
pub mod store;

pub use classify::classify_node_init_result;
pub use env::{parse_bool_env, resolve_trace_path};
pub use error::{Error, Result};
pub use session::TraceSession;
pub use store::TraceStore;
