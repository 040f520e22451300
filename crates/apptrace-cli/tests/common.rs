//! Common test utilities shared across integration tests.
//!
//! Note: Clippy cannot track usage across integration test files,
//! hence the `allow(dead_code)` annotation.
#![allow(dead_code)]

use apptrace_core::env::{RECONCILE_ID_ENV, TRACE_ENABLED_ENV, TRACE_ID_ENV, TRACE_PATH_ENV};
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixture {
    _temp_dir: TempDir,
    trace_path: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let trace_path = temp_dir.path().join("trace.json");

        Self {
            _temp_dir: temp_dir,
            trace_path,
        }
    }

    pub fn trace_path(&self) -> &PathBuf {
        &self.trace_path
    }

    /// A command with tracing enabled and pointed at the fixture's file.
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.env(TRACE_ENABLED_ENV, "1");
        cmd.env(TRACE_PATH_ENV, &self.trace_path);
        cmd
    }

    /// A command with no tracing environment at all.
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("apptrace").expect("Failed to find apptrace binary");
        cmd.env_remove(TRACE_ENABLED_ENV);
        cmd.env_remove(TRACE_PATH_ENV);
        cmd.env_remove(TRACE_ID_ENV);
        cmd.env_remove(RECONCILE_ID_ENV);
        cmd
    }

    pub fn read_trace(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.trace_path).expect("Failed to read trace file");
        serde_json::from_str(&raw).expect("Failed to parse trace file")
    }
}
