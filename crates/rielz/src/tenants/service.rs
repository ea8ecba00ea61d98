use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Tenant, TenantSubmission, TenantValidationError};
use super::repository::TenantRepository;
use crate::houses::{HouseAction, HouseRepository, HouseService, HouseServiceError};
use crate::ids::UserId;
use crate::storage::RepositoryError;

/// Admits tenants into houses owned by the calling landlord.
pub struct TenantService<S> {
    houses: HouseService<S>,
    store: Arc<S>,
}

impl<S> TenantService<S>
where
    S: HouseRepository + TenantRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            houses: HouseService::new(store.clone()),
            store,
        }
    }

    pub async fn admit(
        &self,
        caller: UserId,
        mut submission: TenantSubmission,
    ) -> Result<Tenant, TenantServiceError> {
        submission.prepare();
        submission.validate()?;

        let house_id = submission.house_id();
        let owned = self
            .houses
            .authorize(caller, house_id, HouseAction::AdmitTenant)
            .await?;
        if owned.house().available_rooms <= 0 {
            warn!(house_id = %house_id, "tenant rejected: no available rooms");
            return Err(TenantServiceError::NoAvailableRooms);
        }

        let tenant = self
            .store
            .admit(submission.into_new_tenant())
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => TenantServiceError::NoAvailableRooms,
                RepositoryError::NotFound => {
                    TenantServiceError::House(HouseServiceError::NotFound(house_id))
                }
                other => TenantServiceError::Repository(other),
            })?;

        info!(tenant_id = %tenant.id, house_id = %house_id, "tenant admitted");
        Ok(tenant)
    }
}

/// Error raised by the tenant service.
#[derive(Debug, thiserror::Error)]
pub enum TenantServiceError {
    #[error(transparent)]
    Validation(#[from] TenantValidationError),
    #[error(transparent)]
    House(#[from] HouseServiceError),
    #[error("There are no available rooms")]
    NoAvailableRooms,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
