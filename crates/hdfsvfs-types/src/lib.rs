//! Shared types for the HDFS VFS provider.
//!
//! Everything that both the provider and downstream consumers need to name:
//! the error taxonomy and the parsed endpoint identity of a mount.

pub mod endpoint;
pub mod error;

pub use endpoint::{EndpointIdentity, EndpointParseError};
pub use error::{HdfsVfsError, Result};
