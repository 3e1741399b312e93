//! Boundary to the external distributed-filesystem client library.
//!
//! [`ClientConfig`] is the key/value configuration object handed to the
//! client on connect; [`HdfsClient`] is a live session against the cluster;
//! [`HdfsClientFactory`] turns a configuration (plus an optional
//! impersonated identity) into a session. The real factory is provided by
//! whatever client library a deployment links in; this crate only consumes
//! the boundary.

use std::collections::HashMap;

use crate::vfs::{ReadableFile, WritableFile};
use hdfsvfs_types::Result;

/// Configuration keys recognized by Hadoop-lineage clients. Mount options
/// may set any other key; these are the ones this crate writes itself.
pub mod keys {
    /// Default filesystem URL, `hdfs://host[:port]`.
    pub const DEFAULT_FS: &str = "fs.default.name";
    /// Replication factor for newly written files.
    pub const REPLICATION: &str = "dfs.replication";
    /// Impersonation pair, `"<user>, <credential>"`.
    pub const JOB_UGI: &str = "hadoop.job.ugi";
    /// Authentication mechanism; the literal `kerberos` enables login.
    pub const SECURITY_AUTHENTICATION: &str = "hadoop.security.authentication";
}

/// Mutable string key/value configuration passed to the client on connect.
///
/// Created fresh per connection attempt and discarded once a handle is
/// obtained; it never outlives resolution.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    entries: HashMap<String, String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        ClientConfig::default()
    }

    /// Set a key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over all configured key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A live session against the distributed filesystem.
///
/// Obtained once per mount and shared by every subsequent operation; there
/// is no invalidation or refresh at this layer, so a broken session requires
/// recreating the mount.
pub trait HdfsClient: Send + Sync {
    fn open_read(&self, path: &str) -> Result<Box<dyn ReadableFile>>;
    fn open_write(&self, path: &str) -> Result<Box<dyn WritableFile>>;
    fn exists(&self, path: &str) -> Result<bool>;
    fn mkdir_p(&self, path: &str) -> Result<()>;
    fn remove(&self, path: &str) -> Result<()>;
    fn list_dir(&self, path: &str) -> Result<Vec<String>>;
}

/// Connects to a cluster described by a [`ClientConfig`].
///
/// When `user` is given the session must act as that identity rather than
/// the process's own. Errors are the client library's own; the resolver
/// wraps them with the endpoint URL before surfacing them.
pub trait HdfsClientFactory: Send + Sync {
    fn connect(
        &self,
        config: &ClientConfig,
        user: Option<&str>,
    ) -> std::result::Result<std::sync::Arc<dyn HdfsClient>, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = ClientConfig::new();
        config.set(keys::DEFAULT_FS, "hdfs://nn1:8020");
        assert_eq!(config.get(keys::DEFAULT_FS), Some("hdfs://nn1:8020"));
        assert_eq!(config.get(keys::REPLICATION), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut config = ClientConfig::new();
        config.set("dfs.block.size", "67108864");
        config.set("dfs.block.size", "134217728");
        assert_eq!(config.get("dfs.block.size"), Some("134217728"));
        assert_eq!(config.len(), 1);
    }
}
