//! Registration, login and profile management.
//!
//! Password hashing and verification use bcrypt; the hash is opaque to the
//! rest of the application.

use std::str::FromStr;

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User, UserID},
    stores::UserStore,
};

/// Passwords shorter than this are rejected at registration and password
/// change.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Handles registration, login and profile changes.
#[derive(Debug, Clone)]
pub struct AuthService<U> {
    store: U,
}

impl<U> AuthService<U>
where
    U: UserStore,
{
    /// Create an auth service backed by `store`.
    pub fn new(store: U) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for an empty name, an invalid email or a
    /// password shorter than eight characters, and [Error::AlreadyExists]
    /// when the email is taken.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }

        let email = EmailAddress::from_str(email)
            .map_err(|_| Error::Validation("email address is invalid".to_string()))?;

        validate_password(password)?;

        if self.store.email_exists(&email)? {
            return Err(Error::AlreadyExists("email".to_string()));
        }

        let password_hash = hash_password(password)?;

        self.store.create(NewUser {
            name: name.to_string(),
            email,
            password_hash,
        })
    }

    /// Verify a user's credentials and return the matching user.
    ///
    /// An unknown email and a wrong password both produce
    /// [Error::InvalidCredentials] so registered addresses cannot be
    /// enumerated.
    pub fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let email =
            EmailAddress::from_str(email).map_err(|_| Error::InvalidCredentials)?;

        let user = match self.store.get_by_email(&email) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        };

        let is_valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|error| Error::Hashing(error.to_string()))?;

        if !is_valid {
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }

    /// Get a user's profile.
    pub fn get_profile(&self, user_id: UserID) -> Result<User, Error> {
        self.store.get(user_id)
    }

    /// Update a user's display name and email.
    ///
    /// Changing the email re-checks uniqueness against other users.
    pub fn update_profile(&self, user_id: UserID, name: &str, email: &str) -> Result<User, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }

        let email = EmailAddress::from_str(email)
            .map_err(|_| Error::Validation("email address is invalid".to_string()))?;

        let mut user = self.store.get(user_id)?;

        if user.email != email && self.store.email_exists(&email)? {
            return Err(Error::AlreadyExists("email".to_string()));
        }

        user.update(name.to_string(), email);
        self.store.update(&user)?;

        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    pub fn change_password(
        &self,
        user_id: UserID,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        let mut user = self.store.get(user_id)?;

        let is_valid = bcrypt::verify(current_password, &user.password_hash)
            .map_err(|error| Error::Hashing(error.to_string()))?;

        if !is_valid {
            return Err(Error::InvalidCredentials);
        }

        validate_password(new_password)?;

        user.update_password(hash_password(new_password)?);
        self.store.update(&user)?;

        Ok(())
    }
}

fn validate_password(password: &str) -> Result<(), Error> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

fn hash_password(password: &str) -> Result<String, Error> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|error| Error::Hashing(error.to_string()))
}

#[cfg(test)]
mod auth_service_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, db::initialize, stores::sqlite::SQLiteUserStore};

    use super::AuthService;

    fn get_service() -> AuthService<SQLiteUserStore> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        AuthService::new(SQLiteUserStore::new(Arc::new(Mutex::new(connection))))
    }

    #[test]
    fn register_succeeds_with_valid_input() {
        let service = get_service();

        let user = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        assert_eq!(user.name, "Ada");
        assert_ne!(user.password_hash, "averysecurepassword");
    }

    #[test]
    fn register_rejects_invalid_email() {
        let service = get_service();

        let result = service.register("Ada", "not-an-email", "averysecurepassword");

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn register_rejects_short_password() {
        let service = get_service();

        let result = service.register("Ada", "ada@example.com", "short");

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let service = get_service();
        service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        let result = service.register("Ada 2", "ada@example.com", "anotherpassword");

        assert_eq!(result, Err(Error::AlreadyExists("email".to_string())));
    }

    #[test]
    fn login_succeeds_with_correct_credentials() {
        let service = get_service();
        let registered = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        let user = service.login("ada@example.com", "averysecurepassword").unwrap();

        assert_eq!(user.id, registered.id);
    }

    #[test]
    fn login_with_wrong_password_and_unknown_email_are_indistinguishable() {
        let service = get_service();
        service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        let wrong_password = service.login("ada@example.com", "wrongpassword");
        let unknown_email = service.login("nobody@example.com", "averysecurepassword");

        assert_eq!(wrong_password, Err(Error::InvalidCredentials));
        assert_eq!(unknown_email, Err(Error::InvalidCredentials));
    }

    #[test]
    fn update_profile_rejects_taken_email() {
        let service = get_service();
        let user = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();
        service
            .register("Grace", "grace@example.com", "averysecurepassword")
            .unwrap();

        let result = service.update_profile(user.id, "Ada", "grace@example.com");

        assert_eq!(result, Err(Error::AlreadyExists("email".to_string())));
    }

    #[test]
    fn update_profile_allows_keeping_own_email() {
        let service = get_service();
        let user = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        let updated = service
            .update_profile(user.id, "Ada Lovelace", "ada@example.com")
            .unwrap();

        assert_eq!(updated.name, "Ada Lovelace");
    }

    #[test]
    fn change_password_requires_correct_current_password() {
        let service = get_service();
        let user = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        let result = service.change_password(user.id, "wrongpassword", "newsecurepassword");

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[test]
    fn change_password_allows_login_with_new_password() {
        let service = get_service();
        let user = service
            .register("Ada", "ada@example.com", "averysecurepassword")
            .unwrap();

        service
            .change_password(user.id, "averysecurepassword", "newsecurepassword")
            .unwrap();

        assert!(service.login("ada@example.com", "newsecurepassword").is_ok());
        assert_eq!(
            service.login("ada@example.com", "averysecurepassword"),
            Err(Error::InvalidCredentials)
        );
    }
}
