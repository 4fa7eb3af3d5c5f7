use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::validation::{optional_text, required_text};
use crate::domain::value_object::RiotId;
use crate::domain::ValidationErrors;
use crate::gql::relay::{decode_id, to_global_id, ClientMutationId};
use infra::repos::{CreateFriend, UpdateFriend};

const DISPLAY_NAME_MAX: usize = 255;
const RIOT_PART_MAX: usize = 255;

#[derive(SimpleObject, Clone)]
pub struct Friend {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    pub display_name: String,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
    /// `gameName#tagLine` when both parts are set.
    pub riot_id: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::FriendRow> for Friend {
    fn from(row: infra::models::FriendRow) -> Self {
        let riot_id = RiotId::from_parts(row.riot_game_name.as_deref(), row.riot_tag_line.as_deref())
            .map(|riot| riot.to_string());
        Self {
            id: to_global_id("Friend", row.id),
            local_id: row.id,
            display_name: row.display_name,
            riot_game_name: row.riot_game_name,
            riot_tag_line: row.riot_tag_line,
            riot_id,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// Input types

#[derive(InputObject)]
pub struct CreateFriendInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub display_name: String,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
}

impl CreateFriendInput {
    pub fn validate(&self) -> Result<CreateFriend, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let display_name =
            required_text(&mut errors, "displayName", &self.display_name, DISPLAY_NAME_MAX);
        let riot_game_name = optional_text(
            &mut errors,
            "riotGameName",
            self.riot_game_name.as_deref(),
            RIOT_PART_MAX,
        );
        let riot_tag_line = optional_text(
            &mut errors,
            "riotTagLine",
            self.riot_tag_line.as_deref(),
            RIOT_PART_MAX,
        );
        errors.finish(CreateFriend {
            display_name,
            riot_game_name,
            riot_tag_line,
        })
    }
}

/// Omitted fields keep their value; a blank Riot field clears it.
#[derive(InputObject)]
pub struct UpdateFriendInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub friend_id: ID,
    pub display_name: Option<String>,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
}

/// Validated `UpdateFriendInput`. `None` leaves the field untouched;
/// `Some(None)` clears an optional one.
#[derive(Debug, Clone, PartialEq)]
pub struct FriendPatch {
    pub display_name: Option<String>,
    pub riot_game_name: Option<Option<String>>,
    pub riot_tag_line: Option<Option<String>>,
}

impl FriendPatch {
    pub fn apply(self, current: &infra::models::FriendRow) -> UpdateFriend {
        UpdateFriend {
            display_name: self
                .display_name
                .unwrap_or_else(|| current.display_name.clone()),
            riot_game_name: self
                .riot_game_name
                .unwrap_or_else(|| current.riot_game_name.clone()),
            riot_tag_line: self
                .riot_tag_line
                .unwrap_or_else(|| current.riot_tag_line.clone()),
        }
    }
}

impl UpdateFriendInput {
    pub fn validate(&self) -> Result<(Uuid, FriendPatch), crate::domain::DomainError> {
        let friend_id = decode_id(&self.friend_id, "Friend")?;
        let mut errors = ValidationErrors::default();
        let display_name = self
            .display_name
            .as_deref()
            .map(|name| required_text(&mut errors, "displayName", name, DISPLAY_NAME_MAX));
        let riot_game_name = self
            .riot_game_name
            .as_deref()
            .map(|v| optional_text(&mut errors, "riotGameName", Some(v), RIOT_PART_MAX));
        let riot_tag_line = self
            .riot_tag_line
            .as_deref()
            .map(|v| optional_text(&mut errors, "riotTagLine", Some(v), RIOT_PART_MAX));
        let patch = errors.finish(FriendPatch {
            display_name,
            riot_game_name,
            riot_tag_line,
        })?;
        Ok((friend_id, patch))
    }
}

#[derive(InputObject)]
pub struct FriendIdInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub friend_id: ID,
}

#[derive(SimpleObject)]
pub struct FriendPayload {
    pub client_mutation_id: Option<String>,
    pub friend: Friend,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(display_name: &str) -> CreateFriendInput {
        CreateFriendInput {
            mutation: ClientMutationId::default(),
            display_name: display_name.to_string(),
            riot_game_name: Some(" Hide on bush ".into()),
            riot_tag_line: Some(" KR1 ".into()),
        }
    }

    #[test]
    fn display_name_length_is_bounded() {
        assert!(create_input("").validate().is_err());
        assert!(create_input("   ").validate().is_err());
        assert!(create_input(&"a".repeat(256)).validate().is_err());
        assert!(create_input(&"a".repeat(255)).validate().is_ok());

        let valid = create_input(" Faker ").validate().unwrap();
        assert_eq!(valid.display_name, "Faker");
        assert_eq!(valid.riot_game_name.as_deref(), Some("Hide on bush"));
        assert_eq!(valid.riot_tag_line.as_deref(), Some("KR1"));
    }

    #[test]
    fn riot_parts_keep_their_text_and_allow_255_chars() {
        let mut input = create_input("Faker");
        input.riot_tag_line = Some("#".into());
        let valid = input.validate().unwrap();
        assert_eq!(valid.riot_tag_line.as_deref(), Some("#"));

        input.riot_game_name = Some("g".repeat(255));
        input.riot_tag_line = Some("#KR1".into());
        let valid = input.validate().unwrap();
        assert_eq!(valid.riot_game_name.map(|name| name.len()), Some(255));
        assert_eq!(valid.riot_tag_line.as_deref(), Some("#KR1"));

        input.riot_game_name = Some("g".repeat(256));
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "riotGameName");
    }

    #[test]
    fn empty_display_name_reports_the_field() {
        let errors = create_input("").validate().unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.fields()[0].field, "displayName");
    }

    #[test]
    fn patch_keeps_omitted_fields_and_clears_blank_ones() {
        let friend_id = Uuid::now_v7();
        let input = UpdateFriendInput {
            mutation: ClientMutationId::default(),
            friend_id: to_global_id("Friend", friend_id),
            display_name: None,
            riot_game_name: Some("  ".into()),
            riot_tag_line: None,
        };
        let (id, patch) = input.validate().unwrap();
        assert_eq!(id, friend_id);

        let now = Utc::now();
        let current = infra::models::FriendRow {
            id: friend_id,
            display_name: "Ana".into(),
            riot_game_name: Some("ana".into()),
            riot_tag_line: Some("EUW".into()),
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        let update = patch.apply(&current);
        assert_eq!(update.display_name, "Ana");
        assert_eq!(update.riot_game_name, None);
        assert_eq!(update.riot_tag_line.as_deref(), Some("EUW"));
    }

    #[test]
    fn update_rejects_foreign_global_id() {
        let input = UpdateFriendInput {
            mutation: ClientMutationId::default(),
            friend_id: to_global_id("Session", Uuid::now_v7()),
            display_name: Some("Ana".into()),
            riot_game_name: None,
            riot_tag_line: None,
        };
        assert_eq!(input.validate().unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn riot_id_is_derived_from_both_parts() {
        let now = Utc::now();
        let mut row = infra::models::FriendRow {
            id: Uuid::now_v7(),
            display_name: "Ana".into(),
            riot_game_name: Some("ana".into()),
            riot_tag_line: Some("EUW".into()),
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(Friend::from(row.clone()).riot_id.as_deref(), Some("ana#EUW"));
        row.riot_tag_line = None;
        assert_eq!(Friend::from(row).riot_id, None);
    }
}
