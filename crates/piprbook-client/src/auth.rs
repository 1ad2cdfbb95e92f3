//! Session handling.
//!
//! [`Authentication`] remembers at most one logged-in [`User`]. Credentials
//! are checked against the stored salted SHA-256 hash.

use piprbook_shared::model::{Entity, User};
use piprbook_shared::password::verify_password;
use piprbook_store::{Store, UserRepository};
use tracing::{debug, info, warn};

use crate::error::AuthError;

pub struct Authentication<S: ?Sized> {
    users: UserRepository<S>,
    session: Option<User>,
}

impl<S: Store + ?Sized> Authentication<S> {
    pub fn new(users: UserRepository<S>) -> Self {
        Self {
            users,
            session: None,
        }
    }

    /// Log in as `username`.
    ///
    /// Whoever was logged in before is logged out first, so a failed
    /// attempt leaves no session behind.
    pub fn log_in(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        self.log_out();

        let user = self.users.get_by_username(username)?.ok_or_else(|| {
            warn!(username, "log in failed: unknown user");
            AuthError::UserDoesNotExist(username.to_string())
        })?;

        if !verify_password(password, user.salt(), user.password_hash()) {
            warn!(username, "log in failed: incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        info!(user_id = %user.id(), username, "logged in");
        self.session = Some(user);
        Ok(())
    }

    pub fn log_out(&mut self) {
        if let Some(user) = self.session.take() {
            debug!(user_id = %user.id(), "logged out");
        }
    }

    /// A snapshot of the user taken at log-in time.
    pub fn logged_in_user(&self) -> Option<User> {
        self.session.clone()
    }
}
