use thiserror::Error;

use super::enums::SessionStatus;
use super::validation::ValidationErrors;

/// Every failure a domain operation can return. Each kind has a stable
/// machine-readable code and an HTTP-equivalent status.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Cannot {action} a session that is {from}")]
    InvalidStateTransition {
        from: SessionStatus,
        action: &'static str,
    },

    #[error("Session is read-only once done")]
    SessionReadonly,

    #[error("Session structure is locked by attachments")]
    SessionLocked,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Friend not found")]
    FriendNotFound,

    #[error("Friend is already archived")]
    FriendAlreadyArchived,

    #[error("Friend is not archived")]
    FriendNotArchived,

    #[error("Match not found")]
    MatchNotFound,

    #[error("Match result can only be confirmed once, from DRAFT")]
    InvalidMatchState,

    #[error("Confirmed match cannot be deleted")]
    ConfirmedMatchUndeletable,

    #[error("Attachment not found")]
    AttachmentNotFound,

    #[error("Attachment limit exceeded")]
    AttachmentLimitExceeded,

    #[error("Attachment storage is not configured")]
    StorageUnavailable,

    /// Infrastructure failure. The detail is logged, never sent to clients.
    #[error("Internal server error")]
    Internal(String),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) | DomainError::InvalidId(_) => "VALIDATION_ERROR",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::SessionNotFound => "SESSION_NOT_FOUND",
            DomainError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            DomainError::SessionReadonly => "SESSION_READONLY",
            DomainError::SessionLocked => "SESSION_LOCKED",
            DomainError::CommentNotFound => "COMMENT_NOT_FOUND",
            DomainError::FriendNotFound => "FRIEND_NOT_FOUND",
            DomainError::FriendAlreadyArchived => "FRIEND_ALREADY_ARCHIVED",
            DomainError::FriendNotArchived => "FRIEND_NOT_ARCHIVED",
            DomainError::MatchNotFound => "MATCH_NOT_FOUND",
            DomainError::InvalidMatchState => "INVALID_MATCH_STATE",
            DomainError::ConfirmedMatchUndeletable => "CONFIRMED_MATCH_UNDELETABLE",
            DomainError::AttachmentNotFound => "ATTACHMENT_NOT_FOUND",
            DomainError::AttachmentLimitExceeded => "ATTACHMENT_LIMIT_EXCEEDED",
            DomainError::StorageUnavailable => "STORAGE_UNAVAILABLE",
            DomainError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            DomainError::Validation(_)
            | DomainError::InvalidId(_)
            | DomainError::InvalidStateTransition { .. }
            | DomainError::SessionReadonly
            | DomainError::SessionLocked
            | DomainError::FriendAlreadyArchived
            | DomainError::FriendNotArchived
            | DomainError::InvalidMatchState
            | DomainError::ConfirmedMatchUndeletable => 400,
            DomainError::Unauthorized => 401,
            DomainError::Forbidden(_) => 403,
            DomainError::SessionNotFound
            | DomainError::CommentNotFound
            | DomainError::FriendNotFound
            | DomainError::MatchNotFound
            | DomainError::AttachmentNotFound => 404,
            DomainError::AttachmentLimitExceeded => 409,
            DomainError::StorageUnavailable => 503,
            DomainError::Internal(_) => 500,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {e}"))
    }
}
