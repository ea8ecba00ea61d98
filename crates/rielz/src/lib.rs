//! Rental listings API: landlords register, publish houses and admit tenants.
//!
//! Each feature (`houses`, `users`, `tenants`) exposes a domain model, an async
//! repository trait, a service holding the business rules and an axum router.
//! [`storage`] provides the in-memory and PostgreSQL backends.

pub mod auth;
pub mod config;
pub mod error;
pub mod houses;
pub mod ids;
pub mod response;
pub mod storage;
pub mod telemetry;
pub mod tenants;
mod text;
pub mod users;
