use thiserror::Error;

use crate::endpoint::EndpointParseError;

/// Errors surfaced by the HDFS VFS provider.
///
/// Connection, security-config, and authentication failures are all fatal to
/// the calling operation: nothing in this crate retries, and no client handle
/// is cached when any of them occurs.
#[derive(Error, Debug)]
pub enum HdfsVfsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A client handle could not be obtained from the cluster.
    #[error("could not connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A required local security artifact (properties file, krb5 config,
    /// keytab) is missing. The message embeds the path that was attempted so
    /// operators can fix the deployment without re-deriving it.
    #[error("security configuration error: {0}")]
    SecurityConfig(String),

    /// Credentials were present and files existed, but the login was
    /// rejected. The underlying message is carried unmodified.
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] EndpointParseError),

    /// The backing filesystem does not support the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, HdfsVfsError>;
