//! Errors raised while shaping calls from a diff

/// Errors that can occur while planning calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// The resource lacks the auxiliary field used to build its path
    #[error("resource '{name}' is missing routing field '{field}'")]
    MissingRoutingField {
        /// Resource name
        name: String,
        /// Name of the missing field
        field: String,
    },

    /// The resource definition has the wrong shape for its kind
    #[error("resource '{name}' has an invalid definition: {reason}")]
    InvalidPayload {
        /// Resource name
        name: String,
        /// What was wrong
        reason: String,
    },
}

impl ApplyError {
    /// Create an invalid payload error
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a missing routing field error
    pub fn missing_field(name: &str, field: &str) -> Self {
        Self::MissingRoutingField {
            name: name.to_string(),
            field: field.to_string(),
        }
    }
}
