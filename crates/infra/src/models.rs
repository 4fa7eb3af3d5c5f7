use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Postgres enum types. Labels match the GraphQL wire values.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Lol,
    Futsal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Confirmed,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Attending,
    Undecided,
    NotAttending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lane", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lane {
    Top,
    Jg,
    Mid,
    Adc,
    Sup,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "side", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Blue,
    Red,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Draft,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attachment_scope", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentScope {
    Session,
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attachment_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    LolResultScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "extraction_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionStatus {
    Pending,
    Done,
    Failed,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FriendRow {
    pub id: Uuid,
    pub display_name: String,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: Uuid,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: SessionStatus,
    #[serde(skip_serializing)]
    pub editor_token: String,
    #[serde(skip_serializing)]
    pub admin_token: String,
    pub is_admin_unlocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub friend_id: Uuid,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamPresetMemberRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub friend_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub match_no: i32,
    pub status: MatchStatus,
    pub winner_side: Side,
    pub team_a_side: Side,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchTeamMemberRow {
    pub id: Uuid,
    pub match_id: Uuid,
    pub friend_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub champion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub body: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttachmentRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub match_id: Option<Uuid>,
    pub scope: AttachmentScope,
    #[sqlx(rename = "type")]
    pub attachment_type: AttachmentType,
    pub s3_key: String,
    pub content_type: String,
    pub size: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExtractionResultRow {
    pub id: Uuid,
    pub attachment_id: Uuid,
    pub match_id: Uuid,
    pub status: ExtractionStatus,
    pub model: Option<String>,
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// One participant of one confirmed match, flattened for statistics.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ConfirmedMatchMemberRow {
    pub match_id: Uuid,
    pub winner_side: Side,
    pub team_a_side: Side,
    pub friend_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub champion: Option<String>,
}
