//! This file defines the `User` type and its ID newtype.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::DatabaseID;

/// A newtype wrapper for user IDs so that they cannot be mixed up with other
/// database IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// The fields needed to create a [User]; the store assigns the ID and
/// timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address, unique across all users.
    pub email: EmailAddress,
    /// The bcrypt hash of the user's password.
    ///
    /// Hashing happens at the service boundary; stores treat this as an
    /// opaque string.
    pub password_hash: String,
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The ID of the user.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: EmailAddress,
    /// The bcrypt hash of the user's password.
    pub password_hash: String,
    /// When the user registered.
    pub created_at: OffsetDateTime,
    /// When the user's profile was last changed.
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Update the user's display name and email address.
    pub fn update(&mut self, name: String, email: EmailAddress) {
        self.name = name;
        self.email = email;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Replace the user's password hash.
    pub fn update_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// Marker trait helper: user IDs appear in foreign keys of every other
/// entity, so keep the conversion in one place.
impl From<UserID> for DatabaseID {
    fn from(value: UserID) -> Self {
        value.as_i64()
    }
}
