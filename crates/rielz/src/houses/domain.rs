use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{HouseId, UserId};
use crate::text::{too_long, trim_in_place, MAX_SHORT_TEXT};

/// A persisted house listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub house_type: String,
    pub state: String,
    pub description: String,
    /// Street address or area of the listing.
    pub location: String,
    pub rooms: i32,
    pub available_rooms: i32,
    pub bathrooms: i32,
    pub price: i64,
    pub long_lat: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing fields accepted when a landlord creates a house.
///
/// Missing fields deserialize to their empty value so that [`validate`](Self::validate)
/// reports them. Any `user_id` in the body is ignored: the owner is always the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseSubmission {
    pub house_type: String,
    pub state: String,
    pub description: String,
    pub location: String,
    pub rooms: i32,
    pub available_rooms: i32,
    pub bathrooms: i32,
    pub price: i64,
    pub long_lat: String,
}

impl HouseSubmission {
    /// Strip leading and trailing whitespace from every text field.
    pub fn prepare(&mut self) {
        trim_in_place(&mut self.house_type);
        trim_in_place(&mut self.state);
        trim_in_place(&mut self.description);
        trim_in_place(&mut self.location);
        trim_in_place(&mut self.long_lat);
    }

    pub fn validate(&self) -> Result<(), HouseValidationError> {
        if self.house_type.is_empty() {
            return Err(HouseValidationError::MissingHouseType);
        }
        if self.description.is_empty() {
            return Err(HouseValidationError::MissingDescription);
        }
        if self.location.is_empty() {
            return Err(HouseValidationError::MissingLocation);
        }
        check_lengths(Some(self.house_type.as_str()), Some(self.location.as_str()))?;
        check_counts(
            Some(self.price),
            Some(self.rooms),
            Some(self.bathrooms),
            Some(self.available_rooms),
        )
    }

    pub fn owned_by(self, owner: UserId) -> NewHouse {
        NewHouse {
            user_id: owner,
            listing: self,
        }
    }
}

/// A validated listing ready to be inserted for its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHouse {
    pub user_id: UserId,
    pub listing: HouseSubmission,
}

/// Partial update of a listing. Absent fields keep their stored value and the
/// owner can never be changed through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseUpdate {
    pub house_type: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rooms: Option<i32>,
    pub available_rooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<i64>,
    pub long_lat: Option<String>,
}

impl HouseUpdate {
    pub fn prepare(&mut self) {
        for field in [
            &mut self.house_type,
            &mut self.state,
            &mut self.description,
            &mut self.location,
            &mut self.long_lat,
        ] {
            if let Some(value) = field {
                trim_in_place(value);
            }
        }
    }

    /// Only the fields present in the update are checked.
    pub fn validate(&self) -> Result<(), HouseValidationError> {
        if self.house_type.as_deref() == Some("") {
            return Err(HouseValidationError::MissingHouseType);
        }
        if self.description.as_deref() == Some("") {
            return Err(HouseValidationError::MissingDescription);
        }
        if self.location.as_deref() == Some("") {
            return Err(HouseValidationError::MissingLocation);
        }
        check_lengths(self.house_type.as_deref(), self.location.as_deref())?;
        check_counts(
            self.price,
            self.rooms,
            self.bathrooms,
            self.available_rooms,
        )
    }

    pub fn apply(self, house: &mut House) {
        let HouseUpdate {
            house_type,
            state,
            description,
            location,
            rooms,
            available_rooms,
            bathrooms,
            price,
            long_lat,
        } = self;

        if let Some(value) = house_type {
            house.house_type = value;
        }
        if let Some(value) = state {
            house.state = value;
        }
        if let Some(value) = description {
            house.description = value;
        }
        if let Some(value) = location {
            house.location = value;
        }
        if let Some(value) = rooms {
            house.rooms = value;
        }
        if let Some(value) = available_rooms {
            house.available_rooms = value;
        }
        if let Some(value) = bathrooms {
            house.bathrooms = value;
        }
        if let Some(value) = price {
            house.price = value;
        }
        if let Some(value) = long_lat {
            house.long_lat = value;
        }
    }
}

/// Query parameters accepted by the public listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HouseFilter {
    pub state: Option<String>,
}

impl HouseFilter {
    pub fn state(&self) -> Option<&str> {
        self.state
            .as_deref()
            .map(str::trim)
            .filter(|state| !state.is_empty())
    }
}

/// Field-level validation failures for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HouseValidationError {
    #[error("HouseType is required")]
    MissingHouseType,
    #[error("Description about house is required")]
    MissingDescription,
    #[error("Location of house is required")]
    MissingLocation,
    #[error("HouseType must be at most 100 characters")]
    HouseTypeTooLong,
    #[error("Location of house must be at most 100 characters")]
    LocationTooLong,
    #[error("Price of house is invalid")]
    InvalidPrice,
    #[error("Number of Rooms of house is invalid")]
    InvalidRooms,
    #[error("Number of BathRooms of house is invalid")]
    InvalidBathRooms,
    #[error("Number of AvailableRooms of house is invalid")]
    InvalidAvailableRooms,
}

fn check_lengths(
    house_type: Option<&str>,
    location: Option<&str>,
) -> Result<(), HouseValidationError> {
    if house_type.is_some_and(|value| too_long(value, MAX_SHORT_TEXT)) {
        return Err(HouseValidationError::HouseTypeTooLong);
    }
    if location.is_some_and(|value| too_long(value, MAX_SHORT_TEXT)) {
        return Err(HouseValidationError::LocationTooLong);
    }
    Ok(())
}

fn check_counts(
    price: Option<i64>,
    rooms: Option<i32>,
    bathrooms: Option<i32>,
    available_rooms: Option<i32>,
) -> Result<(), HouseValidationError> {
    if price.is_some_and(|value| value < 0) {
        return Err(HouseValidationError::InvalidPrice);
    }
    if rooms.is_some_and(|value| value < 0) {
        return Err(HouseValidationError::InvalidRooms);
    }
    if bathrooms.is_some_and(|value| value < 0) {
        return Err(HouseValidationError::InvalidBathRooms);
    }
    if available_rooms.is_some_and(|value| value < 0) {
        return Err(HouseValidationError::InvalidAvailableRooms);
    }
    Ok(())
}
