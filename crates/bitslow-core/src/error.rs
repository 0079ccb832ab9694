use thiserror::Error;

/// Domain failures surfaced by exchange operations.
///
/// The display strings are returned to API callers verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Invalid request body")]
    InvalidBody,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid user ID")]
    InvalidUserId,

    #[error("Invalid BitSlow ID")]
    InvalidCoinId,

    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unknown client: {0}")]
    UnknownClient(i64),

    #[error("BitSlow not found")]
    CoinNotFound(i64),

    #[error("No unique combinations available")]
    CombinationsExhausted { attempts: u32 },
}

impl ExchangeError {
    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
