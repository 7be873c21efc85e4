//! Login sessions.
//!
//! A [`Session`] remembers who logged in and runs every other command on
//! that user's behalf. Sessions are cheap: they share the [`Executor`] and
//! only own the current user.

use std::sync::Arc;

use niaga_core::model::UserProfile;
use parking_lot::RwLock;
use tracing::info;

use crate::{Command, Executor, Output, Result};

/// A logged-in (or anonymous) conversation with the executor
pub struct Session {
    executor: Arc<Executor>,
    user: RwLock<Option<UserProfile>>,
}

impl Session {
    /// Anonymous session over `executor`
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            user: RwLock::new(None),
        }
    }

    /// Session already bound to `user`, as restored by a token lookup
    pub fn with_user(executor: Arc<Executor>, user: UserProfile) -> Self {
        Self {
            executor,
            user: RwLock::new(Some(user)),
        }
    }

    /// The shared executor
    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    /// The logged-in user, if any
    pub fn user(&self) -> Option<UserProfile> {
        self.user.read().clone()
    }

    /// Whether somebody is logged in
    pub fn is_logged_in(&self) -> bool {
        self.user.read().is_some()
    }

    /// Execute `cmd` as the session user.
    ///
    /// `Login` replaces the session user on success and `Logout` clears it.
    /// A failed login leaves the previous user in place.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        match cmd {
            Command::Login { .. } => {
                let output = self.executor.execute(None, cmd)?;
                if let Output::User(ref user) = output {
                    *self.user.write() = Some(user.clone());
                }
                Ok(output)
            }
            Command::Logout => {
                if let Some(user) = self.user.write().take() {
                    info!(user = %user.username, "logout");
                }
                Ok(Output::Unit)
            }
            cmd => {
                let user = self.user();
                self.executor.execute(user.as_ref(), cmd)
            }
        }
    }
}
