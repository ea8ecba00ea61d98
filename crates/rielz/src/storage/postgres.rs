use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::RepositoryError;
use crate::config::DatabaseConfig;
use crate::houses::{House, HouseRepository, HouseUpdate, NewHouse};
use crate::ids::{HouseId, TenantId, UserId};
use crate::tenants::{NewTenant, Tenant, TenantRepository};
use crate::users::{NewUser, StoredUser, User, UserRepository};

const MAX_CONNECTIONS: u32 = 10;

const HOUSE_COLUMNS: &str = "id, house_type, state, description, location, rooms, \
    available_rooms, bathrooms, price, long_lat, user_id, created_at, updated_at";

/// PostgreSQL store backed by a `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = match config {
            DatabaseConfig::Url(url) => PgConnectOptions::from_str(url)?,
            DatabaseConfig::Parts {
                host,
                port,
                user,
                name,
                password,
            } => PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .database(name)
                .password(password),
        };
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HouseRow {
    id: i64,
    house_type: String,
    state: String,
    description: String,
    location: String,
    rooms: i32,
    available_rooms: i32,
    bathrooms: i32,
    price: i64,
    long_lat: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HouseRow> for House {
    fn from(row: HouseRow) -> Self {
        House {
            id: HouseId(row.id),
            house_type: row.house_type,
            state: row.state,
            description: row.description,
            location: row.location,
            rooms: row.rooms,
            available_rooms: row.available_rooms,
            bathrooms: row.bathrooms,
            price: row.price,
            long_lat: row.long_lat,
            user_id: UserId(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for StoredUser {
    fn from(row: UserRow) -> Self {
        StoredUser {
            user: User {
                id: UserId(row.id),
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone_number: row.phone_number,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    house_id: i64,
    created_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: TenantId(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            house_id: HouseId(row.house_id),
            created_at: row.created_at,
        }
    }
}

fn storage_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

#[async_trait]
impl HouseRepository for PgStore {
    async fn insert(&self, house: NewHouse) -> Result<House, RepositoryError> {
        let NewHouse { user_id, listing } = house;
        let row = sqlx::query_as::<_, HouseRow>(&format!(
            "INSERT INTO houses (house_type, state, description, location, rooms, \
             available_rooms, bathrooms, price, long_lat, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {HOUSE_COLUMNS}"
        ))
        .bind(listing.house_type)
        .bind(listing.state)
        .bind(listing.description)
        .bind(listing.location)
        .bind(listing.rooms)
        .bind(listing.available_rooms)
        .bind(listing.bathrooms)
        .bind(listing.price)
        .bind(listing.long_lat)
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<House>, RepositoryError> {
        let rows = sqlx::query_as::<_, HouseRow>(&format!(
            "SELECT {HOUSE_COLUMNS} FROM houses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(House::from).collect())
    }

    async fn list_by_landlord(&self, landlord: UserId) -> Result<Vec<House>, RepositoryError> {
        let rows = sqlx::query_as::<_, HouseRow>(&format!(
            "SELECT {HOUSE_COLUMNS} FROM houses WHERE user_id = $1 ORDER BY id"
        ))
        .bind(landlord.0)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(House::from).collect())
    }

    async fn list_by_state(&self, state: &str) -> Result<Vec<House>, RepositoryError> {
        let rows = sqlx::query_as::<_, HouseRow>(&format!(
            "SELECT {HOUSE_COLUMNS} FROM houses WHERE lower(state) = lower($1) ORDER BY id"
        ))
        .bind(state)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(House::from).collect())
    }

    async fn fetch(&self, id: HouseId) -> Result<Option<House>, RepositoryError> {
        let row = sqlx::query_as::<_, HouseRow>(&format!(
            "SELECT {HOUSE_COLUMNS} FROM houses WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(House::from))
    }

    async fn update(&self, id: HouseId, changes: HouseUpdate) -> Result<House, RepositoryError> {
        let row = sqlx::query_as::<_, HouseRow>(&format!(
            "UPDATE houses SET \
             house_type = COALESCE($2, house_type), \
             state = COALESCE($3, state), \
             description = COALESCE($4, description), \
             location = COALESCE($5, location), \
             rooms = COALESCE($6, rooms), \
             available_rooms = COALESCE($7, available_rooms), \
             bathrooms = COALESCE($8, bathrooms), \
             price = COALESCE($9, price), \
             long_lat = COALESCE($10, long_lat), \
             updated_at = now() \
             WHERE id = $1 RETURNING {HOUSE_COLUMNS}"
        ))
        .bind(id.0)
        .bind(changes.house_type)
        .bind(changes.state)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.rooms)
        .bind(changes.available_rooms)
        .bind(changes.bathrooms)
        .bind(changes.price)
        .bind(changes.long_lat)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        row.map(House::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: HouseId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TenantRepository for PgStore {
    async fn admit(&self, tenant: NewTenant) -> Result<Tenant, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let taken = sqlx::query_scalar::<_, i64>(
            "UPDATE houses SET available_rooms = available_rooms - 1, updated_at = now() \
             WHERE id = $1 AND available_rooms > 0 RETURNING id",
        )
        .bind(tenant.house_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;

        if taken.is_none() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM houses WHERE id = $1)",
            )
            .bind(tenant.house_id.0)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;
            return Err(if exists {
                RepositoryError::Conflict
            } else {
                RepositoryError::NotFound
            });
        }

        let row = sqlx::query_as::<_, TenantRow>(
            "INSERT INTO tenants (email, first_name, last_name, phone_number, house_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, email, first_name, last_name, phone_number, house_id, created_at",
        )
        .bind(tenant.email)
        .bind(tenant.first_name)
        .bind(tenant.last_name)
        .bind(tenant.phone_number)
        .bind(tenant.house_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(row.into())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (first_name, last_name, email, phone_number, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, first_name, last_name, email, phone_number, password_hash, created_at",
        )
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.phone_number)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(StoredUser::from(row).user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email, phone_number, password_hash, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(StoredUser::from))
    }
}
