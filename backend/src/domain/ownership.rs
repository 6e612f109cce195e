//! Object-level authorization shared by posts and comments.
//!
//! Reads are open to everyone. Mutations are limited to the resource author.
//! Services load the target first so a missing object reports `404` before
//! ownership is considered.

use super::{Error, UserId};

/// Capability exposing who owns a resource.
pub trait Owned {
    /// Author of the resource.
    fn owner_id(&self) -> &UserId;
}

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Safe methods such as `GET`.
    Read,
    /// Updates and deletions.
    Write,
}

/// Check whether `caller` may perform `access` on `resource`.
///
/// # Examples
/// ```
/// use social::domain::{authorize, Access, Owned, UserId};
///
/// struct Note(UserId);
/// impl Owned for Note {
///     fn owner_id(&self) -> &UserId {
///         &self.0
///     }
/// }
///
/// let owner = UserId::random();
/// let stranger = UserId::random();
/// let note = Note(owner);
/// assert!(authorize(&note, &owner, Access::Write).is_ok());
/// assert!(authorize(&note, &stranger, Access::Read).is_ok());
/// assert!(authorize(&note, &stranger, Access::Write).is_err());
/// ```
pub fn authorize<T>(resource: &T, caller: &UserId, access: Access) -> Result<(), Error>
where
    T: Owned + ?Sized,
{
    match access {
        Access::Read => Ok(()),
        Access::Write if resource.owner_id() == caller => Ok(()),
        Access::Write => Err(Error::forbidden(
            "You do not have permission to perform this action.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    struct Resource(UserId);

    impl Owned for Resource {
        fn owner_id(&self) -> &UserId {
            &self.0
        }
    }

    #[rstest]
    #[case(true, Access::Read, true)]
    #[case(true, Access::Write, true)]
    #[case(false, Access::Read, true)]
    #[case(false, Access::Write, false)]
    fn policy_matrix(#[case] is_owner: bool, #[case] access: Access, #[case] permitted: bool) {
        let owner = UserId::random();
        let caller = if is_owner { owner } else { UserId::random() };
        let outcome = authorize(&Resource(owner), &caller, access);
        match (permitted, outcome) {
            (true, Ok(())) => {}
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (expected, actual) => panic!("expected permitted={expected}, got {actual:?}"),
        }
    }
}
