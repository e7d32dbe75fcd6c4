//! Error types for the lockup gate

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockupError {
    /// A message moves locked value while the chain is locked.
    #[error("Chain is locked: {0}")]
    Locked(String),
    /// A locked message type has no policy rule registered for it.
    #[error("Unhandled message type {type_url}: no lockup policy is registered for it")]
    Unhandled { type_url: String },
    #[error("Unable to decode message {type_url}: {reason}")]
    Decode { type_url: String, reason: String },
    #[error("The param key {key} has not been set")]
    NotFound { key: String },
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Param store error: {0}")]
    Store(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl LockupError {
    pub fn locked(reason: impl Into<String>) -> Self {
        LockupError::Locked(reason.into())
    }

    pub fn unhandled(type_url: impl Into<String>) -> Self {
        LockupError::Unhandled {
            type_url: type_url.into(),
        }
    }

    pub fn decode(type_url: impl Into<String>, reason: impl ToString) -> Self {
        LockupError::Decode {
            type_url: type_url.into(),
            reason: reason.to_string(),
        }
    }

    /// Prefixes the message of an `InvalidParams` error; other kinds pass through.
    pub fn with_prefix(self, prefix: &str) -> Self {
        match self {
            LockupError::InvalidParams(msg) => LockupError::InvalidParams(format!("{}: {}", prefix, msg)),
            other => other,
        }
    }

    /// True for rejections the submitter can resolve by changing the
    /// transaction, as opposed to store or configuration failures.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, LockupError::Locked(_) | LockupError::Decode { .. })
    }
}

impl From<std::io::Error> for LockupError {
    fn from(err: std::io::Error) -> Self {
        LockupError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for LockupError {
    fn from(err: rusqlite::Error) -> Self {
        LockupError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for LockupError {
    fn from(err: serde_json::Error) -> Self {
        LockupError::Store(format!("Serialization failed: {}", err))
    }
}

impl From<toml::de::Error> for LockupError {
    fn from(err: toml::de::Error) -> Self {
        LockupError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LockupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejection_classification() {
        assert!(LockupError::locked("no").is_policy_rejection());
        assert!(LockupError::decode("/x.Msg", "bad json").is_policy_rejection());
        assert!(!LockupError::unhandled("/x.Msg").is_policy_rejection());
        assert!(!LockupError::Store("disk".into()).is_policy_rejection());
    }

    #[test]
    fn test_display_names_the_key() {
        let err = LockupError::NotFound {
            key: "Locked".to_string(),
        };
        assert_eq!(err.to_string(), "The param key Locked has not been set");
    }
}
