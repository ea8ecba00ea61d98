use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{HouseId, TenantId};
use crate::text::{too_long, trim_in_place, MAX_EMAIL, MAX_SHORT_TEXT};

/// A tenant admitted into one of a landlord's houses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub email: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub house_id: HouseId,
    pub created_at: DateTime<Utc>,
}

/// Tenant details submitted by the landlord.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantSubmission {
    pub email: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub house_id: i64,
}

impl TenantSubmission {
    pub fn prepare(&mut self) {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
        trim_in_place(&mut self.phone_number);
        trim_in_place(&mut self.email);
    }

    pub fn validate(&self) -> Result<(), TenantValidationError> {
        if self.first_name.is_empty() {
            return Err(TenantValidationError::MissingFirstName);
        }
        if self.last_name.is_empty() {
            return Err(TenantValidationError::MissingLastName);
        }
        if self.phone_number.is_empty() {
            return Err(TenantValidationError::MissingPhoneNumber);
        }
        if self.email.is_empty() {
            return Err(TenantValidationError::MissingEmail);
        }
        if too_long(&self.first_name, MAX_SHORT_TEXT)
            || too_long(&self.last_name, MAX_SHORT_TEXT)
            || too_long(&self.phone_number, MAX_SHORT_TEXT)
        {
            return Err(TenantValidationError::DetailsTooLong);
        }
        if too_long(&self.email, MAX_EMAIL) {
            return Err(TenantValidationError::EmailTooLong);
        }
        if self.house_id <= 0 {
            return Err(TenantValidationError::InvalidHouseId);
        }
        Ok(())
    }

    pub fn house_id(&self) -> HouseId {
        HouseId(self.house_id)
    }

    pub fn into_new_tenant(self) -> NewTenant {
        NewTenant {
            house_id: HouseId(self.house_id),
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        }
    }
}

/// A validated tenant ready to be admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub house_id: HouseId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TenantValidationError {
    #[error("Firstname is required")]
    MissingFirstName,
    #[error("Lastname is required")]
    MissingLastName,
    #[error("PhoneNumber is required")]
    MissingPhoneNumber,
    #[error("Email is required")]
    MissingEmail,
    #[error("HouseId of house is invalid")]
    InvalidHouseId,
    #[error("Firstname, Lastname and PhoneNumber must be at most 100 characters")]
    DetailsTooLong,
    #[error("Email must be at most 255 characters")]
    EmailTooLong,
}
