//! Connection resolution: from endpoint identity to a live client handle.
//!
//! One resolver exists per mount. The first access builds a fresh client
//! configuration, merges mount options over it, runs the security
//! bootstrapper, and asks the injected factory for a handle; every later
//! access reuses the cached handle. Nothing here retries: a failed
//! resolution caches nothing, so the next access starts clean.

use std::sync::{Arc, Mutex};

use crate::client::{keys, ClientConfig, HdfsClient, HdfsClientFactory};
use crate::options::MountOptions;
use crate::security::{Authenticator, SecurityBootstrapper};
use hdfsvfs_types::{EndpointIdentity, HdfsVfsError, Result};

// Process-wide substitute handle. When installed it is returned for every
// mount, bypassing configuration and authentication entirely. Exists solely
// so tests can observe adapter behavior without a real cluster.
static PROCESS_OVERRIDE: Mutex<Option<Arc<dyn HdfsClient>>> = Mutex::new(None);

/// Install a substitute client handle for every mount in this process.
pub fn set_process_override(handle: Arc<dyn HdfsClient>) {
    *PROCESS_OVERRIDE.lock().unwrap() = Some(handle);
}

/// Remove the process-wide substitute handle, if any.
pub fn clear_process_override() {
    *PROCESS_OVERRIDE.lock().unwrap() = None;
}

fn process_override() -> Option<Arc<dyn HdfsClient>> {
    PROCESS_OVERRIDE.lock().unwrap().clone()
}

/// Resolves and caches the client handle for one mount.
pub struct ConnectionResolver {
    endpoint: EndpointIdentity,
    options: MountOptions,
    factory: Arc<dyn HdfsClientFactory>,
    authenticator: Arc<dyn Authenticator>,
    security: SecurityBootstrapper,
    cached: Mutex<Option<Arc<dyn HdfsClient>>>,
}

impl ConnectionResolver {
    pub fn new(
        endpoint: EndpointIdentity,
        options: MountOptions,
        factory: Arc<dyn HdfsClientFactory>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        ConnectionResolver {
            endpoint,
            options,
            factory,
            authenticator,
            security: SecurityBootstrapper::new(),
            cached: Mutex::new(None),
        }
    }

    /// Replace the default security bootstrapper, which resolves files
    /// against the process working directory (for testing).
    pub fn with_security_bootstrapper(mut self, security: SecurityBootstrapper) -> Self {
        self.security = security;
        self
    }

    pub fn endpoint(&self) -> &EndpointIdentity {
        &self.endpoint
    }

    fn impersonated_user(&self) -> Option<&str> {
        self.endpoint.user.as_deref().filter(|u| !u.is_empty())
    }

    /// Obtain the client handle for this mount, connecting on first use.
    ///
    /// Resolution order: process-wide override handle, then the per-mount
    /// cache, then a fresh connection attempt. Holding the cache lock across
    /// the attempt serializes concurrent first accesses to a single connect.
    pub fn resolve(&self) -> Result<Arc<dyn HdfsClient>> {
        if let Some(handle) = process_override() {
            return Ok(handle);
        }

        let mut cached = self.cached.lock().unwrap();
        if let Some(handle) = cached.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let url = self.endpoint.default_url();
        let mut config = ClientConfig::new();
        config.set(keys::DEFAULT_FS, url.clone());
        config.set(keys::REPLICATION, hdfsvfs_config::get_replication());
        if let Some(user) = self.impersonated_user() {
            let credential = self.endpoint.credential.as_deref().unwrap_or("");
            config.set(keys::JOB_UGI, format!("{}, {}", user, credential));
        }

        self.options.merge_into(&mut config);

        self.security
            .authenticate_if_required(&config, self.authenticator.as_ref())?;

        log::debug!(
            "connecting to {} (impersonating {:?})",
            url,
            self.impersonated_user()
        );
        let handle = self
            .factory
            .connect(&config, self.impersonated_user())
            .map_err(|source| HdfsVfsError::Connection {
                url: url.clone(),
                source,
            })?;
        log::info!("connected to {}", url);

        *cached = Some(Arc::clone(&handle));
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::vfs::{ReadableFile, WritableFile};

    struct StubClient;

    impl HdfsClient for StubClient {
        fn open_read(&self, _path: &str) -> Result<Box<dyn ReadableFile>> {
            Err(HdfsVfsError::Unsupported("stub"))
        }
        fn open_write(&self, _path: &str) -> Result<Box<dyn WritableFile>> {
            Err(HdfsVfsError::Unsupported("stub"))
        }
        fn exists(&self, _path: &str) -> Result<bool> {
            Ok(false)
        }
        fn mkdir_p(&self, _path: &str) -> Result<()> {
            Ok(())
        }
        fn remove(&self, _path: &str) -> Result<()> {
            Ok(())
        }
        fn list_dir(&self, _path: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    /// Factory that records every configuration it was asked to connect
    /// with, and can be told to fail.
    struct StubFactory {
        connects: AtomicUsize,
        configs: Mutex<Vec<(ClientConfig, Option<String>)>>,
        fail: bool,
    }

    impl StubFactory {
        fn new() -> Self {
            StubFactory {
                connects: AtomicUsize::new(0),
                configs: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            StubFactory {
                fail: true,
                ..StubFactory::new()
            }
        }
    }

    impl HdfsClientFactory for StubFactory {
        fn connect(
            &self,
            config: &ClientConfig,
            user: Option<&str>,
        ) -> std::result::Result<Arc<dyn HdfsClient>, Box<dyn std::error::Error + Send + Sync>>
        {
            self.connects.fetch_add(1, Ordering::SeqCst);
            self.configs
                .lock()
                .unwrap()
                .push((config.clone(), user.map(String::from)));
            if self.fail {
                Err("connection refused".into())
            } else {
                Ok(Arc::new(StubClient))
            }
        }
    }

    struct NoopAuthenticator;

    impl Authenticator for NoopAuthenticator {
        fn apply_krb5_config(&self, _krb5_conf: &std::path::Path) {}
        fn set_configuration(&self, _config: &ClientConfig) {}
        fn login(
            &self,
            _principal: Option<&str>,
            _keytab: &std::path::Path,
        ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    fn resolver_for(
        endpoint: EndpointIdentity,
        factory: Arc<StubFactory>,
    ) -> ConnectionResolver {
        ConnectionResolver::new(
            endpoint,
            MountOptions::new(),
            factory,
            Arc::new(NoopAuthenticator),
        )
    }

    #[test]
    fn test_resolve_builds_default_config() {
        hdfsvfs_config::reset_replication();
        let mut ep = EndpointIdentity::new("nn1");
        ep.port = Some(8020);
        let factory = Arc::new(StubFactory::new());
        let resolver = resolver_for(ep, Arc::clone(&factory));

        resolver.resolve().unwrap();

        let configs = factory.configs.lock().unwrap();
        let (config, user) = &configs[0];
        assert_eq!(config.get(keys::DEFAULT_FS), Some("hdfs://nn1:8020"));
        assert_eq!(config.get(keys::REPLICATION), Some("3"));
        assert_eq!(config.get(keys::JOB_UGI), None);
        assert_eq!(user.as_deref(), None);
    }

    #[test]
    fn test_resolve_omits_port_segment_when_unset() {
        let factory = Arc::new(StubFactory::new());
        let resolver = resolver_for(EndpointIdentity::new("nn1"), Arc::clone(&factory));
        resolver.resolve().unwrap();
        let configs = factory.configs.lock().unwrap();
        assert_eq!(configs[0].0.get(keys::DEFAULT_FS), Some("hdfs://nn1"));
    }

    #[test]
    fn test_resolve_sets_impersonation_pair() {
        let mut ep = EndpointIdentity::new("nn2");
        ep.user = Some("alice".to_string());
        ep.credential = Some("secret".to_string());
        let factory = Arc::new(StubFactory::new());
        let resolver = resolver_for(ep, Arc::clone(&factory));

        resolver.resolve().unwrap();

        let configs = factory.configs.lock().unwrap();
        let (config, user) = &configs[0];
        assert_eq!(config.get(keys::JOB_UGI), Some("alice, secret"));
        assert_eq!(user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_resolve_with_user_but_no_credential() {
        let mut ep = EndpointIdentity::new("nn2");
        ep.user = Some("alice".to_string());
        let factory = Arc::new(StubFactory::new());
        let resolver = resolver_for(ep, Arc::clone(&factory));

        resolver.resolve().unwrap();

        let configs = factory.configs.lock().unwrap();
        assert_eq!(configs[0].0.get(keys::JOB_UGI), Some("alice, "));
    }

    #[test]
    fn test_mount_options_override_derived_keys() {
        let mut options = MountOptions::new();
        options.set(keys::REPLICATION, 2i64);
        options.set("dfs.block.size", 134217728i64);
        let factory = Arc::new(StubFactory::new());
        let resolver = ConnectionResolver::new(
            EndpointIdentity::new("nn1"),
            options,
            Arc::clone(&factory) as Arc<dyn HdfsClientFactory>,
            Arc::new(NoopAuthenticator),
        );

        resolver.resolve().unwrap();

        let configs = factory.configs.lock().unwrap();
        let config = &configs[0].0;
        assert_eq!(config.get(keys::REPLICATION), Some("2"));
        assert_eq!(config.get("dfs.block.size"), Some("134217728"));
    }

    #[test]
    fn test_handle_cached_after_first_resolve() {
        let factory = Arc::new(StubFactory::new());
        let resolver = resolver_for(EndpointIdentity::new("nn1"), Arc::clone(&factory));

        let first = resolver.resolve().unwrap();
        let second = resolver.resolve().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.connects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_resolve_caches_nothing() {
        let factory = Arc::new(StubFactory::failing());
        let resolver = resolver_for(EndpointIdentity::new("nn1"), Arc::clone(&factory));

        let err = resolver.resolve().err().unwrap();
        match err {
            HdfsVfsError::Connection { url, .. } => assert_eq!(url, "hdfs://nn1"),
            other => panic!("expected Connection, got {:?}", other),
        }

        // Next access starts clean and re-attempts.
        assert!(resolver.resolve().is_err());
        assert_eq!(factory.connects.load(Ordering::SeqCst), 2);
    }
}
