//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user and add it to the store.
    ///
    /// Returns [Error::AlreadyExists] if the email is already registered.
    fn create(&self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Whether a user with the given email is already registered.
    fn email_exists(&self, email: &EmailAddress) -> Result<bool, Error>;

    /// Persist changes to an existing user.
    ///
    /// Returns [Error::NotFound] if the user does not exist.
    fn update(&self, user: &User) -> Result<(), Error>;
}
