use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::RepositoryError;
use crate::houses::{House, HouseRepository, HouseUpdate, NewHouse};
use crate::ids::{HouseId, TenantId, UserId};
use crate::tenants::{NewTenant, Tenant, TenantRepository};
use crate::users::{NewUser, StoredUser, User, UserRepository};

/// Process-local store used when no database is configured and by tests.
///
/// Identifiers are assigned sequentially from 1 and never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, StoredUser>,
    houses: BTreeMap<HouseId, House>,
    tenants: BTreeMap<TenantId, Tenant>,
    last_user: i64,
    last_house: i64,
    last_tenant: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl HouseRepository for InMemoryStore {
    async fn insert(&self, house: NewHouse) -> Result<House, RepositoryError> {
        let mut tables = self.tables()?;
        tables.last_house += 1;
        let now = Utc::now();
        let NewHouse { user_id, listing } = house;
        let record = House {
            id: HouseId(tables.last_house),
            house_type: listing.house_type,
            state: listing.state,
            description: listing.description,
            location: listing.location,
            rooms: listing.rooms,
            available_rooms: listing.available_rooms,
            bathrooms: listing.bathrooms,
            price: listing.price,
            long_lat: listing.long_lat,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.houses.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<House>, RepositoryError> {
        Ok(self.tables()?.houses.values().cloned().collect())
    }

    async fn list_by_landlord(&self, landlord: UserId) -> Result<Vec<House>, RepositoryError> {
        Ok(self
            .tables()?
            .houses
            .values()
            .filter(|house| house.user_id == landlord)
            .cloned()
            .collect())
    }

    /// Folds case with full Unicode lowercasing, like `lower()` in Postgres.
    async fn list_by_state(&self, state: &str) -> Result<Vec<House>, RepositoryError> {
        let wanted = state.to_lowercase();
        Ok(self
            .tables()?
            .houses
            .values()
            .filter(|house| house.state.to_lowercase() == wanted)
            .cloned()
            .collect())
    }

    async fn fetch(&self, id: HouseId) -> Result<Option<House>, RepositoryError> {
        Ok(self.tables()?.houses.get(&id).cloned())
    }

    async fn update(&self, id: HouseId, changes: HouseUpdate) -> Result<House, RepositoryError> {
        let mut tables = self.tables()?;
        let house = tables.houses.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        changes.apply(house);
        house.updated_at = Utc::now();
        Ok(house.clone())
    }

    async fn delete(&self, id: HouseId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        tables.houses.remove(&id).ok_or(RepositoryError::NotFound)?;
        tables.tenants.retain(|_, tenant| tenant.house_id != id);
        Ok(())
    }
}

#[async_trait]
impl TenantRepository for InMemoryStore {
    async fn admit(&self, tenant: NewTenant) -> Result<Tenant, RepositoryError> {
        let mut tables = self.tables()?;
        let house = tables
            .houses
            .get_mut(&tenant.house_id)
            .ok_or(RepositoryError::NotFound)?;
        if house.available_rooms <= 0 {
            return Err(RepositoryError::Conflict);
        }
        house.available_rooms -= 1;
        house.updated_at = Utc::now();

        tables.last_tenant += 1;
        let record = Tenant {
            id: TenantId(tables.last_tenant),
            email: tenant.email,
            first_name: tenant.first_name,
            last_name: tenant.last_name,
            phone_number: tenant.phone_number,
            house_id: tenant.house_id,
            created_at: Utc::now(),
        };
        tables.tenants.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .users
            .values()
            .any(|stored| stored.user.email == user.email)
        {
            return Err(RepositoryError::Conflict);
        }
        tables.last_user += 1;
        let record = User {
            id: UserId(tables.last_user),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            created_at: Utc::now(),
        };
        tables.users.insert(
            record.id,
            StoredUser {
                user: record.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|stored| stored.user.email == email)
            .cloned())
    }
}
