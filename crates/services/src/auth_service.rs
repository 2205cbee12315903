use std::sync::Arc;

use api::gateway::AuthGateway;
use api::session::{ResumePoint, Session, SessionStore};
use prep_core::model::{NewUser, UserProfile};

use crate::error::AuthError;

/// Sign-in, sign-up, and the persisted session.
///
/// The session store also carries the in-flight attempt id, so a
/// relaunch can drop the user straight back onto the question page.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthGateway>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { auth, sessions }
    }

    /// Exchange credentials for a profile and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::BadCredentials` for a rejected login,
    /// `AuthError::Api` for other request failures, and
    /// `AuthError::Session` if the session cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let profile = self.auth.login(email, password).await?;
        self.sessions.save(&Session::new(profile.clone()))?;
        Ok(profile)
    }

    /// Create an account, then persist the session as a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` when the email is already
    /// registered, `AuthError::Api` for other request failures, and
    /// `AuthError::Session` if the session cannot be persisted.
    pub async fn signup(&self, new_user: NewUser) -> Result<UserProfile, AuthError> {
        let profile = self.auth.register(&new_user).await?;
        self.sessions.save(&Session::new(profile.clone()))?;
        Ok(profile)
    }

    /// Forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        Ok(())
    }

    /// The signed-in user, if a session is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.sessions.load()?.map(|s| s.user().clone()))
    }

    /// The attempt to resume after a relaunch, if one was in flight.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the store cannot be read.
    pub fn resume_attempt(&self) -> Result<Option<ResumePoint>, AuthError> {
        Ok(self.sessions.load()?.and_then(|s| s.resume()))
    }

    /// Record (or clear, with `None`) the in-flight attempt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a stored session, or
    /// `AuthError::Session` if the store cannot be written.
    pub fn set_resume_attempt(&self, resume: Option<ResumePoint>) -> Result<(), AuthError> {
        let mut session = self.sessions.load()?.ok_or(AuthError::NotSignedIn)?;
        session.set_resume(resume);
        self.sessions.save(&session)?;
        Ok(())
    }
}
