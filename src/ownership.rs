//! The row-level access rule shared by every service: a resource is visible
//! and mutable only by its owning user, except for resources in the shared
//! scope (currently only categories).

use serde::{Deserialize, Serialize};

use crate::{Error, models::UserID};

/// Who a resource belongs to.
///
/// Shared resources are visible to every authenticated user. This replaces
/// the owner-id-zero sentinel some systems use, so a real user ID can never
/// collide with "shared".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    /// The resource belongs to a single user.
    Owned(UserID),
    /// The resource is shared across all users.
    Shared,
}

impl Ownership {
    /// The owning user's ID, or `None` for shared resources.
    pub fn user_id(&self) -> Option<UserID> {
        match self {
            Ownership::Owned(user_id) => Some(*user_id),
            Ownership::Shared => None,
        }
    }

    /// Whether the resource is in the shared scope.
    pub fn is_shared(&self) -> bool {
        matches!(self, Ownership::Shared)
    }

    /// Fail with [Error::Forbidden] unless `user_id` may access a resource
    /// with this ownership.
    ///
    /// Applied uniformly before any read-for-update, update or delete.
    /// List operations filter by owner at the query boundary instead.
    pub fn assert_accessible(&self, user_id: UserID) -> Result<(), Error> {
        match self {
            Ownership::Owned(owner) if *owner != user_id => Err(Error::Forbidden),
            _ => Ok(()),
        }
    }
}

impl From<Option<i64>> for Ownership {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(id) => Ownership::Owned(UserID::new(id)),
            None => Ownership::Shared,
        }
    }
}

#[cfg(test)]
mod ownership_tests {
    use crate::{Error, models::UserID};

    use super::Ownership;

    #[test]
    fn owner_can_access_own_resource() {
        let ownership = Ownership::Owned(UserID::new(1));

        assert_eq!(ownership.assert_accessible(UserID::new(1)), Ok(()));
    }

    #[test]
    fn other_user_is_forbidden() {
        let ownership = Ownership::Owned(UserID::new(1));

        assert_eq!(
            ownership.assert_accessible(UserID::new(2)),
            Err(Error::Forbidden)
        );
    }

    #[test]
    fn shared_resources_are_accessible_by_anyone() {
        assert_eq!(Ownership::Shared.assert_accessible(UserID::new(42)), Ok(()));
    }

    #[test]
    fn nullable_column_maps_to_ownership() {
        assert_eq!(
            Ownership::from(Some(3)),
            Ownership::Owned(UserID::new(3))
        );
        assert_eq!(Ownership::from(None), Ownership::Shared);
    }
}
