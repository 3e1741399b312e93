//! Global configuration for the HDFS VFS provider.
//!
//! Values are initialized from environment variables on first access and can
//! be overridden at runtime via setter functions.
//!
//! # Replication configuration
//!
//! - `HDFSVFS_REPLICATION`: Replication factor copied verbatim into the
//!   `dfs.replication` key of every client configuration this process
//!   builds. Read once, as a string. Default: `3`.

use std::sync::{Mutex, Once};

const DEFAULT_REPLICATION: &str = "3";

static DFS_REPLICATION: Mutex<Option<String>> = Mutex::new(None);

static INIT: Once = Once::new();

/// Ensure environment variable overrides are applied (idempotent).
fn ensure_init() {
    INIT.call_once(|| {
        if let Ok(val) = std::env::var("HDFSVFS_REPLICATION") {
            if !val.trim().is_empty() {
                *DFS_REPLICATION.lock().unwrap() = Some(val.trim().to_string());
            }
        }
    });
}

/// Get the replication factor, as the string that will be stored in the
/// client configuration. Defaults to `"3"` when no override is set.
pub fn get_replication() -> String {
    ensure_init();
    DFS_REPLICATION
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| DEFAULT_REPLICATION.to_string())
}

/// Override the replication factor for the rest of the process.
pub fn set_replication(value: impl Into<String>) {
    ensure_init();
    *DFS_REPLICATION.lock().unwrap() = Some(value.into());
}

/// Clear any replication override, restoring the default.
pub fn reset_replication() {
    ensure_init();
    *DFS_REPLICATION.lock().unwrap() = None;
}
