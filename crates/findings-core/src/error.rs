//! Unified error model for the findings core
use thiserror::Error;

/// Which collection an identifier or value belongs to.
pub type EntityKind = &'static str;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindingsError {
    #[error("NOT_FOUND/{kind} {id}")]
    NotFound { kind: EntityKind, id: u64 },

    #[error("DUPLICATE_ID/{kind} {id}")]
    DuplicateId { kind: EntityKind, id: u64 },

    #[error("INVALID_ENUM/{kind}: unrecognized value {value:?}")]
    InvalidEnum { kind: EntityKind, value: String },

    #[error("INVARIANT/{0}")]
    InvariantViolation(String),

    #[error("PARSE/{0}")]
    Parse(String),
}

impl FindingsError {
    /// Stable machine-readable kind, used by API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::InvalidEnum { .. } => "invalid_enum",
            Self::InvariantViolation(_) => "invariant_violation",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<serde_json::Error> for FindingsError {
    fn from(err: serde_json::Error) -> Self {
        FindingsError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FindingsError>;
