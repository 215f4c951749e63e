//! Schema Bootstrapper
//!
//! Idempotently ensures the keyspace and user table exist before any
//! traffic is served. Both statements use IF NOT EXISTS, so running the
//! bootstrap repeatedly or concurrently across restarts is safe.

use scylla::Session;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// Ensure the keyspace and user table exist
///
/// Any failure here is fatal: the process must not accept traffic
/// against a schema it could not verify.
pub async fn ensure_schema(session: &Session, config: &StoreConfig) -> Result<()> {
    session
        .query(keyspace_cql(&config.keyspace, config.replication_factor), &[])
        .await
        .map_err(|e| Error::Schema(format!("creating keyspace {}: {}", config.keyspace, e)))?;

    session
        .query(table_cql(&config.keyspace, &config.table), &[])
        .await
        .map_err(|e| Error::Schema(format!("creating table {}: {}", config.table, e)))?;

    tracing::info!(
        keyspace = %config.keyspace,
        table = %config.table,
        "Schema bootstrap complete"
    );

    Ok(())
}

/// CQL for the keyspace, SimpleStrategy with the configured factor
///
/// Keyspace names are validated as bare identifiers at config load, so
/// interpolating them here is safe; they are never request-derived.
fn keyspace_cql(keyspace: &str, replication_factor: u32) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    )
}

/// CQL for the user table: flat id -> (name, email) mapping
fn table_cql(keyspace: &str, table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {}.{} (id uuid PRIMARY KEY, name text, email text)",
        keyspace, table
    )
}
