//! Accounts primitive
//!
//! Registration, login and role management over the users table.
//!
//! Usernames and emails are unique ignoring case. Passwords are stored as
//! salted hashes (see `niaga_security::password`); hashing happens before
//! the transaction starts so a commit retry never re-hashes.

use crate::validate::required;
use niaga_core::model::{Role, User, UserProfile};
use niaga_core::{EntityRef, NiagaError, NiagaResult, Table};
use niaga_engine::{Database, TransactionContext};
use niaga_security::{hash_password, verify_password};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Username of the bootstrap administrator
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Password of the bootstrap administrator
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
/// Email of the bootstrap administrator
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@fajarmandiri.store";
/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;

/// A sign-up request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Login name
    pub username: String,
    /// Contact email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Must equal `password`
    pub confirm_password: String,
}

/// Accounts primitive
///
/// Stateless facade over the Database engine. Clone is cheap.
#[derive(Clone)]
pub struct Accounts {
    db: Arc<Database>,
}

impl Accounts {
    /// Create a new accounts facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new cashier account
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a password mismatch, a short password or
    ///   blank username/email
    /// - `AlreadyExists` when the username or email is taken
    pub fn register(&self, reg: &Registration) -> NiagaResult<UserProfile> {
        let username = required("username", &reg.username)?;
        let email = required("email", &reg.email)?;
        if reg.password != reg.confirm_password {
            return Err(NiagaError::invalid_input("password mismatch"));
        }
        if reg.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(NiagaError::invalid_input(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let password_hash = hash_password(&reg.password);

        let user = self.db.transaction(|txn| {
            create_user(txn, &username, &email, &password_hash, Role::Cashier)
        })?;
        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user.profile())
    }

    /// Check credentials of an active user
    ///
    /// Unknown users, inactive users and wrong passwords all fail with
    /// the same `InvalidCredentials` error.
    pub fn authenticate(&self, username: &str, password: &str) -> NiagaResult<UserProfile> {
        let wanted = username.trim().to_lowercase();
        let user = self.db.read(|txn| {
            txn.find_record::<User, _>(|u| u.username.to_lowercase() == wanted)
        })?;
        match user {
            Some(user) if user.is_active && verify_password(password, &user.password_hash) => {
                Ok(user.profile())
            }
            _ => Err(NiagaError::InvalidCredentials),
        }
    }

    /// All users in id order
    pub fn list_users(&self) -> NiagaResult<Vec<UserProfile>> {
        let users = self.db.read(|txn| txn.scan_records::<User>())?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// One user
    pub fn get_user(&self, user_id: u64) -> NiagaResult<UserProfile> {
        self.db
            .read(|txn| txn.require::<User>(user_id))
            .map(|u| u.profile())
    }

    /// Flip a user between active and inactive
    ///
    /// `actor_id` may not deactivate their own account.
    pub fn toggle_active(&self, actor_id: u64, user_id: u64) -> NiagaResult<UserProfile> {
        if actor_id == user_id {
            return Err(NiagaError::invalid_input(
                "you cannot deactivate your own account",
            ));
        }
        let user = self.db.transaction(|txn| {
            let mut user = txn.require::<User>(user_id)?;
            user.is_active = !user.is_active;
            txn.put_record(&user)?;
            Ok(user)
        })?;
        info!(user_id, active = user.is_active, "user activation toggled");
        Ok(user.profile())
    }

    /// Promote a user to admin, or demote an admin to cashier
    pub fn toggle_admin(&self, actor_id: u64, user_id: u64) -> NiagaResult<UserProfile> {
        self.update_role(actor_id, user_id, |current| match current {
            Role::Admin => Role::Cashier,
            _ => Role::Admin,
        })
    }

    /// Give a user an explicit role
    pub fn set_role(&self, actor_id: u64, user_id: u64, role: Role) -> NiagaResult<UserProfile> {
        self.update_role(actor_id, user_id, |_| role)
    }

    fn update_role<F>(&self, actor_id: u64, user_id: u64, next: F) -> NiagaResult<UserProfile>
    where
        F: Fn(Role) -> Role,
    {
        let user = self.db.transaction(|txn| {
            let mut user = txn.require::<User>(user_id)?;
            let role = next(user.role);
            if actor_id == user_id && role.rank() < user.role.rank() {
                return Err(NiagaError::invalid_input("you cannot demote your own account"));
            }
            user.role = role;
            txn.put_record(&user)?;
            Ok(user)
        })?;
        info!(user_id, role = %user.role, "user role changed");
        Ok(user.profile())
    }

    /// Create `admin / admin123` unless a user named `admin` exists
    ///
    /// Returns true when the account was created.
    pub fn ensure_default_admin(&self) -> NiagaResult<bool> {
        let exists = self.db.read(|txn| {
            Ok(txn
                .find_record::<User, _>(|u| u.username.eq_ignore_ascii_case(DEFAULT_ADMIN_USERNAME))?
                .is_some())
        })?;
        if exists {
            return Ok(false);
        }

        let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD);
        let created = self.db.transaction(|txn| {
            if txn
                .find_record::<User, _>(|u| u.username.eq_ignore_ascii_case(DEFAULT_ADMIN_USERNAME))?
                .is_some()
            {
                return Ok(false);
            }
            create_user(
                txn,
                DEFAULT_ADMIN_USERNAME,
                DEFAULT_ADMIN_EMAIL,
                &password_hash,
                Role::Admin,
            )?;
            Ok(true)
        })?;
        if created {
            info!(username = DEFAULT_ADMIN_USERNAME, "default admin created");
        }
        Ok(created)
    }
}

fn create_user(
    txn: &mut TransactionContext,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> NiagaResult<User> {
    let users = txn.scan_records::<User>()?;
    if users.iter().any(|u| u.username.eq_ignore_ascii_case(username)) {
        return Err(NiagaError::already_exists(EntityRef::new(Table::Users, username)));
    }
    if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
        return Err(NiagaError::already_exists(EntityRef::new(Table::Users, email)));
    }
    let user = User {
        id: txn.next_id(Table::Users)?,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        is_active: true,
        created_at: txn.now(),
    };
    txn.put_record(&user)?;
    Ok(user)
}
