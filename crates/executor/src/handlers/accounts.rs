//! Account command handlers.
//!
//! Login is stateless here: it authenticates and returns the profile. The
//! session decides what to remember.

use std::sync::Arc;

use niaga_core::model::{Role, UserProfile};
use niaga_primitives::Registration;
use tracing::info;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::require_actor;
use crate::{Output, Result};

/// Handle Login command.
pub fn login(p: &Arc<Primitives>, username: String, password: String) -> Result<Output> {
    let user = convert_result(p.accounts.authenticate(&username, &password))?;
    info!(user = %user.username, role = %user.role, "login");
    Ok(Output::User(user))
}

/// Handle WhoAmI command.
pub fn whoami(actor: Option<&UserProfile>) -> Result<Output> {
    Ok(Output::MaybeUser(actor.cloned()))
}

/// Handle Register command.
pub fn register(p: &Arc<Primitives>, registration: Registration) -> Result<Output> {
    let user = convert_result(p.accounts.register(&registration))?;
    Ok(Output::User(user))
}

/// Handle UserList command.
pub fn user_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Users(convert_result(p.accounts.list_users())?))
}

/// Handle UserGet command.
pub fn user_get(p: &Arc<Primitives>, user_id: u64) -> Result<Output> {
    Ok(Output::User(convert_result(p.accounts.get_user(user_id))?))
}

/// Handle UserToggleActive command.
pub fn user_toggle_active(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    user_id: u64,
) -> Result<Output> {
    let actor_id = require_actor(actor)?.id;
    let user = convert_result(p.accounts.toggle_active(actor_id, user_id))?;
    Ok(Output::User(user))
}

/// Handle UserToggleAdmin command.
pub fn user_toggle_admin(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    user_id: u64,
) -> Result<Output> {
    let actor_id = require_actor(actor)?.id;
    let user = convert_result(p.accounts.toggle_admin(actor_id, user_id))?;
    Ok(Output::User(user))
}

/// Handle UserSetRole command.
pub fn user_set_role(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    user_id: u64,
    role: Role,
) -> Result<Output> {
    let actor_id = require_actor(actor)?.id;
    let user = convert_result(p.accounts.set_role(actor_id, user_id, role))?;
    Ok(Output::User(user))
}
