//! Storage backends implementing the house, tenant and user repositories.
//!
//! [`InMemoryStore`] keeps everything in process and is what the service falls
//! back to when no database is configured. [`PgStore`] is the PostgreSQL
//! backend with embedded migrations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use crate::houses::HouseRepository;
use crate::tenants::TenantRepository;
use crate::users::UserRepository;

/// Error enumeration for repository failures shared by every backend.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A backend able to serve every repository the API needs.
pub trait Store: HouseRepository + TenantRepository + UserRepository + 'static {}

impl<T> Store for T where T: HouseRepository + TenantRepository + UserRepository + 'static {}
