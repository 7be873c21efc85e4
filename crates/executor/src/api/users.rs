//! User accounts.
//!
//! Access via `niaga.users()`. Registration is open to anyone; everything
//! else requires an admin session.

use crate::{Command, Error, Output, Result, Session};
use niaga_core::model::{Role, UserProfile};

/// Handle for account management.
pub struct Users<'a> {
    session: &'a Session,
}

impl<'a> Users<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Create a cashier account.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserProfile> {
        match self.session.execute(Command::Register {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("Register")),
        }
    }

    /// All accounts.
    pub fn list(&self) -> Result<Vec<UserProfile>> {
        match self.session.execute(Command::UserList)? {
            Output::Users(users) => Ok(users),
            _ => Err(Error::unexpected("UserList")),
        }
    }

    /// One account.
    pub fn get(&self, user_id: u64) -> Result<UserProfile> {
        match self.session.execute(Command::UserGet { user_id })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("UserGet")),
        }
    }

    /// Activate or deactivate an account. Admins cannot deactivate themselves.
    pub fn toggle_active(&self, user_id: u64) -> Result<UserProfile> {
        match self.session.execute(Command::UserToggleActive { user_id })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("UserToggleActive")),
        }
    }

    /// Promote to admin, or demote an admin to cashier.
    pub fn toggle_admin(&self, user_id: u64) -> Result<UserProfile> {
        match self.session.execute(Command::UserToggleAdmin { user_id })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("UserToggleAdmin")),
        }
    }

    /// Assign a role.
    pub fn set_role(&self, user_id: u64, role: Role) -> Result<UserProfile> {
        match self.session.execute(Command::UserSetRole { user_id, role })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("UserSetRole")),
        }
    }
}
