//! User Repository
//!
//! The CRUD operation set against the user table. Each operation is a
//! single prepared statement executed on the shared session: no
//! batching, no read-modify-write, no multi-row transactions.

use std::sync::Arc;

use futures::StreamExt;
use scylla::prepared_statement::PreparedStatement;
use scylla::{FromRow, Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::session::ClusterConnection;

/// The sole persisted entity: a flat id -> (name, email) record
///
/// `id` is assigned server-side exactly once, at creation. Both other
/// fields are optional free-form text with no uniqueness constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Repository of single-statement operations on the user table
///
/// Statements are prepared once at startup with the configured keyspace
/// and table names baked in; every request-derived value is bound.
pub struct UserRepository {
    session: Arc<Session>,
    insert: PreparedStatement,
    select_one: PreparedStatement,
    select_all: PreparedStatement,
    update: PreparedStatement,
    delete: PreparedStatement,
}

impl UserRepository {
    /// Prepare all statements against an open session
    pub async fn prepare(connection: &ClusterConnection, config: &StoreConfig) -> Result<Self> {
        let session = Arc::clone(connection.session());
        let ks = &config.keyspace;
        let table = &config.table;

        let insert = session.prepare(insert_cql(ks, table)).await?;
        let select_one = session.prepare(select_one_cql(ks, table)).await?;
        let select_all = session.prepare(select_all_cql(ks, table)).await?;
        let update = session.prepare(update_cql(ks, table)).await?;
        let delete = session.prepare(delete_cql(ks, table)).await?;

        Ok(Self {
            session,
            insert,
            select_one,
            select_all,
            update,
            delete,
        })
    }

    /// Insert a new user under a freshly generated id
    pub async fn create(&self, name: Option<String>, email: Option<String>) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
        };

        self.session
            .execute(&self.insert, (user.id, user.name.clone(), user.email.clone()))
            .await?;

        tracing::debug!(id = %user.id, "User created");
        Ok(user)
    }

    /// Fetch one user by id
    ///
    /// An absent row is `Ok(None)`, not an error. A malformed id fails
    /// with `Error::InvalidId` before any store call.
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let id = parse_user_id(id)?;

        let result = self.session.execute(&self.select_one, (id,)).await?;
        result
            .maybe_first_row_typed::<User>()
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// Fetch every user in the table
    ///
    /// Deliberately unbounded; rows are drained through the driver's
    /// paged iterator so a limit can be added here later without
    /// changing callers.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let mut rows = self
            .session
            .execute_iter(self.select_all.clone(), &[])
            .await?
            .into_typed::<User>();

        let mut users = Vec::new();
        while let Some(row) = rows.next().await {
            users.push(row.map_err(|e| Error::Decode(e.to_string()))?);
        }
        Ok(users)
    }

    /// Overwrite both fields of a user, keyed by id
    ///
    /// This is a blind write with CQL upsert semantics: updating an id
    /// that was never created writes a new row under that id. Both
    /// fields are fully replaced, including replacement with null.
    pub async fn update(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User> {
        let id = parse_user_id(id)?;

        self.session
            .execute(&self.update, (name.clone(), email.clone(), id))
            .await?;

        tracing::debug!(%id, "User updated");
        Ok(User { id, name, email })
    }

    /// Delete a user by id
    ///
    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_user_id(id)?;

        self.session.execute(&self.delete, (id,)).await?;

        tracing::debug!(%id, "User deleted");
        Ok(())
    }
}

/// Parse a client-supplied id, rejecting malformed input before any
/// store call is made
fn parse_user_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| Error::InvalidId(id.to_string()))
}

// Statement text builders. Keyspace/table names come from validated
// configuration, fixed at startup; values are always bound parameters.

fn insert_cql(keyspace: &str, table: &str) -> String {
    format!(
        "INSERT INTO {}.{} (id, name, email) VALUES (?, ?, ?)",
        keyspace, table
    )
}

fn select_one_cql(keyspace: &str, table: &str) -> String {
    format!("SELECT id, name, email FROM {}.{} WHERE id = ?", keyspace, table)
}

fn select_all_cql(keyspace: &str, table: &str) -> String {
    format!("SELECT id, name, email FROM {}.{}", keyspace, table)
}

fn update_cql(keyspace: &str, table: &str) -> String {
    format!(
        "UPDATE {}.{} SET name = ?, email = ? WHERE id = ?",
        keyspace, table
    )
}

fn delete_cql(keyspace: &str, table: &str) -> String {
    format!("DELETE FROM {}.{} WHERE id = ?", keyspace, table)
}
