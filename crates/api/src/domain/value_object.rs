use std::any::TypeId;
use std::fmt;

use serde::Serialize;

/// Immutable domain value compared by content.
pub trait ValueObject: 'static {
    type Value: Serialize;

    fn value(&self) -> &Self::Value;
}

/// True iff `other` is present, is the same concrete type as `this`, and both
/// serialize to the same JSON text. Field order is significant.
pub fn value_equals<A, B>(this: &A, other: Option<&B>) -> bool
where
    A: ValueObject,
    B: ValueObject,
{
    let Some(other) = other else {
        return false;
    };
    if TypeId::of::<A>() != TypeId::of::<B>() {
        return false;
    }
    match (
        serde_json::to_string(this.value()),
        serde_json::to_string(other.value()),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiotIdValue {
    pub game_name: String,
    pub tag_line: String,
}

/// Riot account handle, `gameName#tagLine`.
#[derive(Debug, Clone)]
pub struct RiotId(RiotIdValue);

impl RiotId {
    /// Both parts must be present after trimming.
    pub fn new(game_name: &str, tag_line: &str) -> Option<Self> {
        let game_name = game_name.trim();
        let tag_line = tag_line.trim();
        if game_name.is_empty() || tag_line.is_empty() {
            return None;
        }
        Some(Self(RiotIdValue {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        }))
    }

    pub fn from_parts(game_name: Option<&str>, tag_line: Option<&str>) -> Option<Self> {
        Self::new(game_name?, tag_line?)
    }

    pub fn game_name(&self) -> &str {
        &self.0.game_name
    }

    pub fn tag_line(&self) -> &str {
        &self.0.tag_line
    }

    /// Lowercased form used for lookups; Riot ids are case-insensitive.
    pub fn normalized(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.0.game_name, self.0.tag_line)
    }
}

impl ValueObject for RiotId {
    type Value = RiotIdValue;

    fn value(&self) -> &RiotIdValue {
        &self.0
    }
}

/// Bearer secret granting editor or admin access to one session.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    const BYTES: usize = 32;

    /// 32 random bytes, lowercase hex.
    pub fn generate() -> Self {
        let bytes: [u8; Self::BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl ValueObject for SessionToken {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same shape as `RiotId`, different type.
    struct AccountHandle(RiotIdValue);

    impl ValueObject for AccountHandle {
        type Value = RiotIdValue;

        fn value(&self) -> &RiotIdValue {
            &self.0
        }
    }

    fn riot(game: &str, tag: &str) -> RiotId {
        RiotId::new(game, tag).unwrap()
    }

    #[test]
    fn same_type_same_value_is_equal() {
        assert!(value_equals(&riot("Faker", "KR1"), Some(&riot("Faker", "KR1"))));
        assert!(!value_equals(&riot("Faker", "KR1"), Some(&riot("Faker", "KR2"))));
    }

    #[test]
    fn different_types_are_never_equal() {
        let id = riot("Faker", "KR1");
        let handle = AccountHandle(id.value().clone());
        assert!(!value_equals(&id, Some(&handle)));
        assert!(!value_equals(&handle, Some(&id)));
    }

    #[test]
    fn missing_other_is_not_equal() {
        assert!(!value_equals::<RiotId, RiotId>(&riot("Faker", "KR1"), None));
    }

    #[test]
    fn riot_id_formats_and_normalizes() {
        let id = riot("  Hide on bush ", " KR1 ");
        assert_eq!(id.to_string(), "Hide on bush#KR1");
        assert_eq!(id.normalized(), "hide on bush#kr1");
        assert!(RiotId::from_parts(Some("Faker"), None).is_none());
        assert!(RiotId::new("Faker", "  ").is_none());
        assert_eq!(riot("Faker", "#").to_string(), "Faker##");
    }

    #[test]
    fn generated_tokens_are_64_hex_chars_and_distinct() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(!value_equals(&a, Some(&b)));
        assert!(value_equals(&a, SessionToken::parse(a.as_str()).as_ref()));
    }
}
