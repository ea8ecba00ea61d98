use async_trait::async_trait;

use super::domain::{House, HouseUpdate, NewHouse};
use crate::ids::{HouseId, UserId};
use crate::storage::RepositoryError;

/// Persistence operations for house listings.
#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Store a new listing, returning it with its generated id and timestamps.
    async fn insert(&self, house: NewHouse) -> Result<House, RepositoryError>;
    async fn list(&self) -> Result<Vec<House>, RepositoryError>;
    async fn list_by_landlord(&self, landlord: UserId) -> Result<Vec<House>, RepositoryError>;
    async fn list_by_state(&self, state: &str) -> Result<Vec<House>, RepositoryError>;
    async fn fetch(&self, id: HouseId) -> Result<Option<House>, RepositoryError>;
    /// Apply the present fields of `changes`; fails with `NotFound` for unknown ids.
    async fn update(&self, id: HouseId, changes: HouseUpdate) -> Result<House, RepositoryError>;
    /// Remove a listing; fails with `NotFound` when nothing was deleted.
    async fn delete(&self, id: HouseId) -> Result<(), RepositoryError>;
}
