//! Error conversion from internal error types.
//!
//! Maps [`NiagaError`] onto the executor's [`Error`], keeping the record
//! reference of not-found and conflict errors as `table/id` text.

use crate::Error;
use niaga_core::NiagaError;

impl From<NiagaError> for Error {
    fn from(err: NiagaError) -> Self {
        match err {
            NiagaError::NotFound { entity } => Error::NotFound {
                entity: entity.to_string(),
            },
            NiagaError::AlreadyExists { entity } => Error::AlreadyExists {
                entity: entity.to_string(),
            },
            NiagaError::InvalidInput { message } => Error::InvalidInput { reason: message },

            NiagaError::InsufficientStock {
                item,
                available,
                requested,
            } => Error::InsufficientStock {
                item,
                available,
                requested,
            },
            NiagaError::InsufficientBalance {
                saver,
                balance,
                requested,
            } => Error::InsufficientBalance {
                saver,
                balance,
                requested,
            },
            NiagaError::InsufficientPayment { total, paid } => {
                Error::InsufficientPayment { total, paid }
            }
            NiagaError::Overpayment { amount, remaining } => {
                Error::Overpayment { amount, remaining }
            }
            NiagaError::InvalidTransition { entity, from, to } => Error::InvalidTransition {
                entity: entity.to_string(),
                from,
                to,
            },

            NiagaError::InvalidCredentials => Error::InvalidCredentials,
            NiagaError::Conflict { reason } => Error::Conflict { reason },

            // System errors
            NiagaError::Storage { message, source } => {
                let reason = if let Some(ref src) = source {
                    format!("{}: {}", message, src)
                } else {
                    message
                };
                Error::Io { reason }
            }
            NiagaError::Serialization { message } => Error::Serialization { reason: message },
            NiagaError::Corruption { message } => Error::Io {
                reason: format!("data corruption: {}", message),
            },
            NiagaError::Internal { message } => Error::Internal { reason: message },
        }
    }
}

/// Convert a `NiagaResult` to an executor [`Result`](crate::Result).
pub fn convert_result<T>(result: niaga_core::NiagaResult<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}
