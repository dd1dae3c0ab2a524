//! Error taxonomy for core operations.
//!
//! [`StoreError`] is the typed error returned by the entity store, calendar
//! index, and query service. [`ErrorCode`] maps each failure class to a
//! stable machine-readable code for CLI/agent output.

use std::fmt;

/// Typed failure from a core operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The requesting user does not own the referenced special date.
    #[error("user {user_id} does not own special date {date_id}")]
    Unauthorized { user_id: i64, date_id: i64 },

    /// A date string did not parse as `YYYY-MM-DD`.
    #[error("invalid calendar date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A required field was empty or missing.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },

    /// A uniqueness or referential constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// The event map for a calendar entry could not be encoded.
    #[error("encode calendar event map: {0}")]
    Encode(#[from] serde_json::Error),

    /// The underlying write could not be committed; the whole operation
    /// was rolled back.
    #[error("write could not be committed: {0}")]
    Write(#[from] rusqlite::Error),
}

impl StoreError {
    /// Classify this error into its stable machine code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::InvalidDate { .. } => ErrorCode::InvalidDate,
            Self::MissingField { .. } => ErrorCode::MissingField,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Encode(_) | Self::Write(_) => ErrorCode::WriteFailed,
        }
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    Unauthorized,
    InvalidDate,
    MissingField,
    Conflict,
    WriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "E2001",
            Self::Unauthorized => "E2002",
            Self::InvalidDate => "E2003",
            Self::MissingField => "E2004",
            Self::Conflict => "E2005",
            Self::WriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Entity not found",
            Self::Unauthorized => "Not the owner of this special date",
            Self::InvalidDate => "Invalid calendar date",
            Self::MissingField => "Required field missing",
            Self::Conflict => "Conflicts with an existing record",
            Self::WriteFailed => "Write could not be committed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some("Check the id with `dbk list`."),
            Self::Unauthorized => None,
            Self::InvalidDate => Some("Use the YYYY-MM-DD format, e.g. 2025-01-01."),
            Self::MissingField => None,
            Self::Conflict => Some("Pick a different username/email, or remove the owned dates first."),
            Self::WriteFailed => Some("Retry once. If persistent, check disk space and permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, StoreError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::InvalidDate,
            ErrorCode::MissingField,
            ErrorCode::Conflict,
            ErrorCode::WriteFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::Unauthorized.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn store_error_maps_to_expected_code() {
        let err = StoreError::NotFound {
            entity: "special date",
            id: 42,
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.to_string(), "special date 42 not found");

        let err = StoreError::Unauthorized {
            user_id: 1,
            date_id: 2,
        };
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
