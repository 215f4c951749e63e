//! Cluster Connection Manager
//!
//! Owns the lifecycle of the single driver session shared by every
//! request handler, and exposes the cluster topology the driver has
//! discovered through that session.

use std::sync::Arc;
use std::time::Duration;

use scylla::{Session, SessionBuilder};
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::Result;

/// One member of the store cluster at observation time
///
/// Sourced live from the driver's metadata; nothing here is persisted
/// by this service.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterNode {
    /// Node network address
    pub address: String,
    /// Datacenter label
    pub datacenter: Option<String>,
    /// Rack label
    pub rack: Option<String>,
}

/// Handle on the open cluster session
///
/// Cheap to clone; all clones share one underlying session. The driver's
/// own connection pooling makes the session safe for concurrent use, so
/// this is the only shared resource in the process.
#[derive(Clone)]
pub struct ClusterConnection {
    session: Arc<Session>,
}

impl ClusterConnection {
    /// Open a session against the configured contact points
    ///
    /// Fails if no contact point is reachable within the configured
    /// timeout; callers treat that as a fatal startup error.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let session = SessionBuilder::new()
            .known_nodes(&config.contact_points)
            .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .await?;

        tracing::info!(
            contact_points = ?config.contact_points,
            "Cluster session established"
        );

        Ok(Self {
            session: Arc::new(session),
        })
    }

    /// Get the shared session
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Current known cluster membership
    ///
    /// Re-reads the driver's metadata on every call; an empty list is a
    /// valid (degenerate) view, not an error.
    pub fn topology(&self) -> Vec<ClusterNode> {
        let cluster_data = self.session.get_cluster_data();
        cluster_data
            .get_nodes_info()
            .iter()
            .map(|node| ClusterNode {
                address: node.address.ip().to_string(),
                datacenter: node.datacenter.clone(),
                rack: node.rack.clone(),
            })
            .collect()
    }
}
