pub mod enums;
pub mod error;
pub mod lifecycle;
pub mod stats;
pub mod validation;
pub mod value_object;

pub use enums::{
    AttachmentScope, AttachmentType, AttendanceStatus, ContentType, ExtractionStatus, Lane,
    MatchStatus, SessionStatus, Side, Team,
};
pub use error::DomainError;
pub use validation::{FieldError, ValidationErrors};
