//! Tenant admission into landlords' houses.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{NewTenant, Tenant, TenantSubmission, TenantValidationError};
pub use repository::TenantRepository;
pub use router::{tenant_router, TenantAdded};
pub use service::{TenantService, TenantServiceError};
