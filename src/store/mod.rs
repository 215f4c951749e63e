//! Store access layer
//!
//! Session lifecycle, schema bootstrap, and the user repository.

pub mod schema;
pub mod session;
pub mod users;

pub use schema::ensure_schema;
pub use session::{ClusterConnection, ClusterNode};
pub use users::{User, UserRepository};
