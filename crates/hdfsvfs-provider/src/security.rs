//! Kerberos security bootstrapping for secured clusters.
//!
//! When the merged client configuration declares `kerberos` authentication,
//! the bootstrapper reads principal/keytab/krb5 locations from a local
//! `principal.properties` file, validates that the referenced files exist,
//! and drives a keytab login through the [`Authenticator`] boundary. For the
//! common unsecured case it is a strict no-op: no file is touched.
//!
//! The underlying authentication library holds its state process-wide: the
//! krb5 config registration and the logged-in identity are global, so only a
//! single active Kerberos identity per process is supported. Two mounts
//! authenticating concurrently with different principals is outside this
//! layer's contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::client::{keys, ClientConfig};
use hdfsvfs_types::{HdfsVfsError, Result};

/// Properties file looked up in the bootstrapper's base directory.
pub const PRINCIPAL_PROPERTIES: &str = "principal.properties";

/// Default krb5 configuration file name, used when the property is unset.
pub const DEFAULT_KRB5_CONF: &str = "krb5.conf";

/// Default keytab file name, used when both keytab properties are unset.
pub const DEFAULT_KEYTAB: &str = "user.keytab";

// Property keys. The "prncipal" spelling matches property files already
// deployed in the field; correcting it would break them.
const PROP_KRB5_CONF: &str = "krb5.conf";
const PROP_KEYTAB: &str = "hdfs.user.keytab";
const PROP_KEYTAB_FALLBACK: &str = "user.keytab";
const PROP_PRINCIPAL: &str = "hdfs.prncipal";
const PROP_PRINCIPAL_FALLBACK: &str = "prncipal";

/// Boundary to the authentication subsystem of the client library.
///
/// All three operations mutate process-wide state in the real subsystem;
/// implementations are expected to document that, not hide it.
pub trait Authenticator: Send + Sync {
    /// Register the krb5 config file's absolute path as process-wide
    /// security configuration. The library reads it from a fixed global
    /// location, not from a passed parameter.
    fn apply_krb5_config(&self, krb5_conf: &Path);

    /// Push the merged client configuration into the subsystem's global
    /// configuration state.
    fn set_configuration(&self, config: &ClientConfig);

    /// Authenticate with the given principal and keytab. On success the
    /// process's ambient login identity becomes this principal for the
    /// remainder of the process.
    fn login(
        &self,
        principal: Option<&str>,
        keytab: &Path,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Parse the well-known Java properties subset: `key=value` or `key:value`
/// per line, `#` and `!` comment lines, blank lines ignored, keys and
/// values trimmed.
fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        // Split at the first separator encountered, either kind; a value
        // may itself contain the other separator character.
        if let Some(idx) = line.find(['=', ':']) {
            let key = line[..idx].trim();
            let value = line[idx + 1..].trim();
            props.insert(key.to_string(), value.to_string());
        }
    }
    props
}

/// Look up a property, treating an empty value the same as an absent one.
fn non_empty<'a>(props: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    props.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Performs Kerberos login before a connection is used, when required.
pub struct SecurityBootstrapper {
    /// Directory `principal.properties` and relative krb5/keytab paths are
    /// resolved against. Defaults to the process working directory.
    base_dir: PathBuf,
}

impl Default for SecurityBootstrapper {
    fn default() -> Self {
        SecurityBootstrapper::new()
    }
}

impl SecurityBootstrapper {
    pub fn new() -> Self {
        SecurityBootstrapper {
            base_dir: PathBuf::from("."),
        }
    }

    /// Resolve security files against an explicit directory instead of the
    /// process working directory (for testing).
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        SecurityBootstrapper {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    /// Authenticate against the cluster if the configuration requires it.
    ///
    /// No-op unless `hadoop.security.authentication` is the literal
    /// `kerberos`. Fails with [`HdfsVfsError::SecurityConfig`] when a
    /// required local file is missing (the message names the attempted
    /// path) and with [`HdfsVfsError::Authentication`] when the login
    /// itself is rejected. Both are fatal; the caller must not connect.
    pub fn authenticate_if_required(
        &self,
        config: &ClientConfig,
        authenticator: &dyn Authenticator,
    ) -> Result<()> {
        match config.get(keys::SECURITY_AUTHENTICATION) {
            Some("kerberos") => {}
            _ => return Ok(()),
        }

        let props_path = self.base_dir.join(PRINCIPAL_PROPERTIES);
        if !props_path.exists() {
            let msg = format!(
                "could not find the file {}. The file path is [{}].",
                PRINCIPAL_PROPERTIES,
                props_path.display()
            );
            log::error!("{}", msg);
            return Err(HdfsVfsError::SecurityConfig(msg));
        }

        let content = std::fs::read_to_string(&props_path)?;
        let props = parse_properties(&content);

        let krb5_conf = non_empty(&props, PROP_KRB5_CONF).unwrap_or(DEFAULT_KRB5_CONF);
        let krb5_path = self.resolve(krb5_conf);
        if !krb5_path.exists() {
            let msg = format!(
                "could not find the file {}. The file path is [{}].",
                DEFAULT_KRB5_CONF,
                absolute(&krb5_path).display()
            );
            log::error!("{}", msg);
            return Err(HdfsVfsError::SecurityConfig(msg));
        }

        let keytab = non_empty(&props, PROP_KEYTAB)
            .or_else(|| non_empty(&props, PROP_KEYTAB_FALLBACK))
            .unwrap_or(DEFAULT_KEYTAB);
        let keytab_path = self.resolve(keytab);
        if !keytab_path.exists() {
            let msg = format!(
                "could not find the file {}. The file path is [{}].",
                DEFAULT_KEYTAB,
                absolute(&keytab_path).display()
            );
            log::error!("{}", msg);
            return Err(HdfsVfsError::SecurityConfig(msg));
        }

        authenticator.apply_krb5_config(&absolute(&krb5_path));
        authenticator.set_configuration(config);

        let principal = non_empty(&props, PROP_PRINCIPAL)
            .or_else(|| non_empty(&props, PROP_PRINCIPAL_FALLBACK));

        match authenticator.login(principal, &absolute(&keytab_path)) {
            Ok(()) => {
                log::info!(
                    "logged in as {}",
                    principal.unwrap_or("<no principal configured>")
                );
                Ok(())
            }
            Err(e) => {
                log::error!("keytab login rejected: {}", e);
                Err(HdfsVfsError::Authentication(e.to_string()))
            }
        }
    }
}

/// Absolute form of a path for diagnostics; the path itself may not exist.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
