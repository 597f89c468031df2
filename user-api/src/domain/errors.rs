use thiserror::Error;

/// Named, expected failure conditions arising from domain rules or input
/// validation. Each variant is an identity-comparable sentinel, so callers
/// classify by matching instead of inspecting message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusinessError {
    #[error("user not found")]
    UserNotFound,
    #[error("user name cannot be empty")]
    EmptyName,
    #[error("user email cannot be empty")]
    EmptyEmail,
    #[error("user already exists")]
    UserAlreadyExists,
}

impl BusinessError {
    /// Stable machine-readable code, distinct from the display message.
    pub const fn code(self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::EmptyName => "user_name_empty",
            Self::EmptyEmail => "user_email_empty",
            Self::UserAlreadyExists => "user_already_exists",
        }
    }
}

/// Error crossing the use-case boundary: either a recognized business-rule
/// violation, or an unexpected failure tagged with the operation that raised
/// it so the cause stays attached without string concatenation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Business(#[from] BusinessError),
    #[error("{operation}: {source}")]
    Internal {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl DomainError {
    pub fn internal(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            operation,
            source: source.into(),
        }
    }

    /// The business sentinel carried by this error, when it is one.
    pub fn business(&self) -> Option<BusinessError> {
        match self {
            Self::Business(err) => Some(*err),
            Self::Internal { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_sentinels_compare_by_identity() {
        assert_eq!(BusinessError::UserNotFound, BusinessError::UserNotFound);
        assert_ne!(BusinessError::UserNotFound, BusinessError::UserAlreadyExists);
    }

    #[test]
    fn codes_differ_from_messages() {
        for err in [
            BusinessError::UserNotFound,
            BusinessError::EmptyName,
            BusinessError::EmptyEmail,
            BusinessError::UserAlreadyExists,
        ] {
            assert_ne!(err.code(), err.to_string());
        }
    }

    #[test]
    fn internal_errors_are_not_business() {
        let err = DomainError::internal("find by email", anyhow::anyhow!("connection refused"));
        assert_eq!(err.business(), None);
        assert_eq!(err.to_string(), "find by email: connection refused");
    }

    #[test]
    fn business_wrapper_is_transparent() {
        let err = DomainError::from(BusinessError::EmptyName);
        assert_eq!(err.business(), Some(BusinessError::EmptyName));
        assert_eq!(err.to_string(), "user name cannot be empty");
    }
}
