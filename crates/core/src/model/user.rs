use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user name is empty")]
    EmptyName,

    #[error("invalid email address: {raw}")]
    InvalidEmail { raw: String },
}

/// The signed-in user, cached in the session store between launches.
///
/// Serializable because the session store persists it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    name: String,
    email: String,
    grade: Option<u8>,
}

impl UserProfile {
    /// # Errors
    ///
    /// Returns `UserError` for a blank name or an email without an `@`.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        grade: Option<u8>,
    ) -> Result<Self, UserError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserError::EmptyName);
        }
        let email = email.into();
        if !email.contains('@') {
            return Err(UserError::InvalidEmail { raw: email });
        }
        Ok(Self {
            id,
            name,
            email,
            grade,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn grade(&self) -> Option<u8> {
        self.grade
    }
}

/// Sign-up form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub grade: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_validates_email() {
        let err = UserProfile::new(UserId::new(1), "Ada", "not-an-email", None).unwrap_err();
        assert!(matches!(err, UserError::InvalidEmail { .. }));
    }

    #[test]
    fn profile_validates_name() {
        let err = UserProfile::new(UserId::new(1), " ", "ada@example.com", None).unwrap_err();
        assert!(matches!(err, UserError::EmptyName));
    }
}
