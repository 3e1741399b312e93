//! HDFS provider for a generic virtual-filesystem abstraction.
//!
//! The provider maps the VFS lifecycle (open, create, list, capability
//! advertisement) onto an external distributed-filesystem client, reached
//! through the [`client::HdfsClient`] boundary. The work this crate actually
//! owns is connection establishment:
//!
//! - [`resolver::ConnectionResolver`] derives a cluster endpoint from the
//!   mount's symbolic name, builds a client configuration, and obtains (or
//!   reuses) a live client handle;
//! - [`options::MountOptions`] carries per-mount overrides merged verbatim
//!   into that configuration;
//! - [`security::SecurityBootstrapper`] performs Kerberos login before the
//!   connection is used, when the merged configuration asks for it.
//!
//! The DFS wire protocol, replication, and consistency all live behind the
//! client boundary; the VFS framework's handle lifecycle lives in the host.

pub mod client;
pub mod hdfs_fs;
pub mod options;
pub mod resolver;
pub mod security;
pub mod vfs;

pub use client::{ClientConfig, HdfsClient, HdfsClientFactory};
pub use hdfs_fs::HdfsFileSystem;
pub use options::{MountOptions, OptionValue};
pub use resolver::ConnectionResolver;
pub use security::{Authenticator, SecurityBootstrapper};
pub use vfs::{Capability, ReadableFile, VirtualFileSystem, WritableFile};
