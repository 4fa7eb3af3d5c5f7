//! Relay conventions: opaque global ids, cursor connections and
//! `clientMutationId` echo.

use std::fmt::Display;

use async_graphql::{Enum, InputObject, SimpleObject, ID};
use base64::{engine::general_purpose, Engine as _};
use uuid::Uuid;

use crate::domain::{DomainError, ValidationErrors};

/// Largest `first`/`last` a connection accepts.
pub const RELAY_MAX_PAGE: i32 = 100;

const CURSOR_PREFIX: &str = "cursor:";

/// `base64("Type:localId")`
pub fn to_global_id(type_name: &str, local_id: impl Display) -> ID {
    ID(general_purpose::STANDARD.encode(format!("{type_name}:{local_id}")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGlobalId {
    pub type_name: String,
    pub id: String,
}

/// Splits at the first `:`. `None` for anything that is not base64 of `Type:id`.
pub fn from_global_id(global_id: &str) -> Option<ResolvedGlobalId> {
    let bytes = general_purpose::STANDARD.decode(global_id.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, id) = decoded.split_once(':')?;
    if type_name.is_empty() || id.is_empty() {
        return None;
    }
    Some(ResolvedGlobalId {
        type_name: type_name.to_string(),
        id: id.to_string(),
    })
}

pub fn assert_global_id_type(
    resolved: &ResolvedGlobalId,
    expected_type: &'static str,
) -> Result<(), DomainError> {
    if resolved.type_name != expected_type {
        return Err(DomainError::InvalidId(expected_type));
    }
    Ok(())
}

/// Local UUID behind a global id of the expected type.
pub fn decode_id(global_id: &str, expected_type: &'static str) -> Result<Uuid, DomainError> {
    let resolved = from_global_id(global_id).ok_or(DomainError::InvalidId(expected_type))?;
    assert_global_id_type(&resolved, expected_type)?;
    Uuid::parse_str(&resolved.id).map_err(|_| DomainError::InvalidId(expected_type))
}

#[derive(SimpleObject, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

pub fn encode_cursor(local_id: Uuid) -> String {
    general_purpose::STANDARD.encode(format!("{CURSOR_PREFIX}{local_id}"))
}

pub fn decode_cursor(cursor: &str) -> Option<Uuid> {
    let bytes = general_purpose::STANDARD.decode(cursor.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    Uuid::parse_str(decoded.strip_prefix(CURSOR_PREFIX)?).ok()
}

/// `first`/`after`/`last`/`before` as a connection field receives them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

/// A validated window: cursors decoded, exactly one of `first`/`last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub after: Option<Uuid>,
    pub before: Option<Uuid>,
    pub first: Option<usize>,
    pub last: Option<usize>,
}

impl ConnectionArgs {
    pub fn validate(&self) -> Result<Window, DomainError> {
        let mut errors = ValidationErrors::default();

        if self.first.is_some() && self.last.is_some() {
            errors.push("last", "cannot be combined with first");
        }
        if self.after.is_some() && self.before.is_some() {
            errors.push("before", "cannot be combined with after");
        }
        if self.first.is_none() && self.last.is_none() {
            errors.push("first", "first or last is required");
        }
        let first = page_size(&mut errors, "first", self.first);
        let last = page_size(&mut errors, "last", self.last);
        let after = cursor(&mut errors, "after", self.after.as_deref());
        let before = cursor(&mut errors, "before", self.before.as_deref());

        Ok(errors.finish(Window {
            after,
            before,
            first,
            last,
        })?)
    }
}

fn page_size(errors: &mut ValidationErrors, field: &'static str, value: Option<i32>) -> Option<usize> {
    let value = value?;
    if value < 0 {
        errors.push(field, "must be at least 0");
    } else if value > RELAY_MAX_PAGE {
        errors.push(field, format!("must be at most {RELAY_MAX_PAGE}"));
    }
    usize::try_from(value).ok()
}

fn cursor(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) -> Option<Uuid> {
    let value = value?;
    let decoded = decode_cursor(value);
    if decoded.is_none() {
        errors.push(field, "is not a valid cursor");
    }
    decoded
}

/// Slices ordered items to the window. A cursor naming an item that is not
/// in `items` leaves nothing on that side of it.
pub fn paginate<T>(
    items: Vec<T>,
    id_of: impl Fn(&T) -> Uuid,
    window: &Window,
) -> (Vec<(String, T)>, PageInfo) {
    let mut edges: Vec<(Uuid, T)> = items.into_iter().map(|item| (id_of(&item), item)).collect();

    let mut has_previous_page = false;
    let mut has_next_page = false;

    if let Some(after) = window.after {
        match edges.iter().position(|(id, _)| *id == after) {
            Some(at) => {
                has_previous_page = true;
                edges.drain(..=at);
            }
            None => edges.clear(),
        }
    }
    if let Some(before) = window.before {
        match edges.iter().position(|(id, _)| *id == before) {
            Some(at) => {
                has_next_page = true;
                edges.truncate(at);
            }
            None => edges.clear(),
        }
    }

    if let Some(first) = window.first {
        if edges.len() > first {
            edges.truncate(first);
            has_next_page = true;
        }
    }
    if let Some(last) = window.last {
        if edges.len() > last {
            let skip = edges.len() - last;
            edges.drain(..skip);
            has_previous_page = true;
        }
    }

    let edges: Vec<(String, T)> = edges
        .into_iter()
        .map(|(id, item)| (encode_cursor(id), item))
        .collect();
    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: edges.first().map(|(cursor, _)| cursor.clone()),
        end_cursor: edges.last().map(|(cursor, _)| cursor.clone()),
    };
    (edges, page_info)
}

/// Embedded (flattened) in every mutation input.
#[derive(InputObject, Clone, Debug, Default)]
pub struct ClientMutationId {
    pub client_mutation_id: Option<String>,
}
