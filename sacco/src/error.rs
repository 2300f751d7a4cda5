use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("member {member_id} already exists")]
    DuplicateMember { member_id: String },

    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error("exchange rate not found for {from} -> {to}")]
    RateNotFound { from: String, to: String },

    #[error("notification {notification_id} not found")]
    NotificationNotFound { notification_id: String },

    #[error("storage error: {0}")]
    Storage(String),
}

/// Credential rejection, distinct from transport failures so callers can
/// tell "bad login" apart from "the member list was unreachable".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("member not found")]
    MemberNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
