//! Settings command handlers.
//!
//! Handles SettingsGet and SettingsUpdate.

use std::sync::Arc;

use niaga_core::model::{BusinessSettings, UserProfile};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::require_actor;
use crate::{Output, Result};

/// Handle SettingsGet command: stored settings or the defaults.
pub fn settings_get(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Settings(convert_result(p.settings.get())?))
}

/// Handle SettingsUpdate command.
pub fn settings_update(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    settings: BusinessSettings,
) -> Result<Output> {
    let by = require_actor(actor)?.id;
    let saved = convert_result(p.settings.update(&settings, by))?;
    Ok(Output::Settings(saved))
}
