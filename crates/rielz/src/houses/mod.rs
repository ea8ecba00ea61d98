//! House listings: the entity, its repository seam, the ownership-checking
//! service and the HTTP endpoints.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{House, HouseFilter, HouseSubmission, HouseUpdate, HouseValidationError, NewHouse};
pub use repository::HouseRepository;
pub use router::{house_router, HouseCreated};
pub use service::{HouseAction, HouseService, HouseServiceError, OwnedHouse};
