use async_trait::async_trait;

use super::domain::{NewTenant, Tenant};
use crate::storage::RepositoryError;

/// Persistence operations for tenants.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Insert the tenant and take one available room of its house in a single
    /// step. Fails with `NotFound` for an unknown house and `Conflict` when the
    /// house has no room left.
    async fn admit(&self, tenant: NewTenant) -> Result<Tenant, RepositoryError>;
}
