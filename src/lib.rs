//! Ringfront - HTTP CRUD facade over a Cassandra/ScyllaDB cluster
//!
//! A small service that maps HTTP requests onto single-statement CQL
//! operations against one user table, and exposes the cluster's live
//! topology as seen by the driver.
//!
//! # Architecture
//!
//! One driver session is opened at startup and shared by every request
//! handler. Schema bootstrap (keyspace + table, both idempotent) runs to
//! completion before the HTTP listener binds, so a reachable service
//! always has its table in place.

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use config::RingfrontConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::RingfrontConfig;
    pub use crate::error::{Error, Result};
    pub use crate::store::{ClusterConnection, ClusterNode, User, UserRepository};
}
