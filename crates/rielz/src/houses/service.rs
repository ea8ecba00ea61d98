use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{House, HouseFilter, HouseSubmission, HouseUpdate, HouseValidationError};
use super::repository::HouseRepository;
use crate::ids::{HouseId, UserId};
use crate::storage::RepositoryError;

/// Mutations that require the caller to own the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HouseAction {
    Update,
    Delete,
    AdmitTenant,
}

impl HouseAction {
    pub fn denial_message(self) -> &'static str {
        match self {
            HouseAction::Update => "Unauthorized house update",
            HouseAction::Delete => "Unauthorized house delete",
            HouseAction::AdmitTenant => "Unauthorized tenant registration",
        }
    }
}

impl fmt::Display for HouseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseAction::Update => f.write_str("update"),
            HouseAction::Delete => f.write_str("delete"),
            HouseAction::AdmitTenant => f.write_str("admit tenant"),
        }
    }
}

/// Proof that the caller owns the wrapped house, handed out by [`HouseService::authorize`].
#[derive(Debug)]
pub struct OwnedHouse {
    house: House,
}

impl OwnedHouse {
    pub fn house(&self) -> &House {
        &self.house
    }
}

/// Service orchestrating validation, ownership checks and the house repository.
pub struct HouseService<R> {
    repository: Arc<R>,
}

impl<R> HouseService<R>
where
    R: HouseRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a listing owned by `caller`, regardless of any owner sent by the client.
    pub async fn create(
        &self,
        caller: UserId,
        mut submission: HouseSubmission,
    ) -> Result<House, HouseServiceError> {
        submission.prepare();
        submission.validate()?;

        let house = self.repository.insert(submission.owned_by(caller)).await?;
        info!(house_id = %house.id, landlord = %caller, "house created");
        Ok(house)
    }

    pub async fn list(&self, filter: &HouseFilter) -> Result<Vec<House>, HouseServiceError> {
        let houses = match filter.state() {
            Some(state) => self.repository.list_by_state(state).await?,
            None => self.repository.list().await?,
        };
        Ok(houses)
    }

    pub async fn list_by_landlord(
        &self,
        landlord: UserId,
    ) -> Result<Vec<House>, HouseServiceError> {
        Ok(self.repository.list_by_landlord(landlord).await?)
    }

    pub async fn get(&self, id: HouseId) -> Result<House, HouseServiceError> {
        self.repository
            .fetch(id)
            .await?
            .ok_or(HouseServiceError::NotFound(id))
    }

    /// Fetch the house and confirm `caller` owns it before a mutation.
    ///
    /// Lookup failures surface as errors; the ownership comparison only ever runs
    /// against a stored record.
    pub async fn authorize(
        &self,
        caller: UserId,
        id: HouseId,
        action: HouseAction,
    ) -> Result<OwnedHouse, HouseServiceError> {
        let house = self.get(id).await?;
        if house.user_id != caller {
            warn!(house_id = %id, caller = %caller, %action, "rejected house mutation by non-owner");
            return Err(HouseServiceError::NotOwner { action });
        }
        Ok(OwnedHouse { house })
    }

    pub async fn update(
        &self,
        owned: OwnedHouse,
        mut changes: HouseUpdate,
    ) -> Result<House, HouseServiceError> {
        changes.prepare();
        changes.validate()?;

        let id = owned.house.id;
        let house = self
            .repository
            .update(id, changes)
            .await
            .map_err(|err| not_found_as(err, id))?;
        info!(house_id = %id, "house updated");
        Ok(house)
    }

    pub async fn delete(&self, owned: OwnedHouse) -> Result<(), HouseServiceError> {
        let id = owned.house.id;
        self.repository
            .delete(id)
            .await
            .map_err(|err| not_found_as(err, id))?;
        info!(house_id = %id, "house deleted");
        Ok(())
    }
}

fn not_found_as(err: RepositoryError, id: HouseId) -> HouseServiceError {
    match err {
        RepositoryError::NotFound => HouseServiceError::NotFound(id),
        other => HouseServiceError::Repository(other),
    }
}

/// Error raised by the house service.
#[derive(Debug, thiserror::Error)]
pub enum HouseServiceError {
    #[error(transparent)]
    Validation(#[from] HouseValidationError),
    #[error("house {0} not found")]
    NotFound(HouseId),
    #[error("{}", .action.denial_message())]
    NotOwner { action: HouseAction },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
