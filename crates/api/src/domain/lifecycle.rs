//! State transitions of sessions, matches and friends. Pure guard functions;
//! services call them between loading a locked row and writing it back.

use super::enums::{MatchStatus, SessionStatus};
use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Confirm,
    MarkDone,
    Reopen,
}

impl SessionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAction::Confirm => "confirm",
            SessionAction::MarkDone => "mark done",
            SessionAction::Reopen => "reopen",
        }
    }
}

/// SCHEDULED -> CONFIRMED -> DONE, and DONE -> CONFIRMED on reopen.
pub fn session_transition(
    from: SessionStatus,
    action: SessionAction,
) -> Result<SessionStatus, DomainError> {
    match (from, action) {
        (SessionStatus::Scheduled, SessionAction::Confirm) => Ok(SessionStatus::Confirmed),
        (SessionStatus::Confirmed, SessionAction::MarkDone) => Ok(SessionStatus::Done),
        (SessionStatus::Done, SessionAction::Reopen) => Ok(SessionStatus::Confirmed),
        (from, action) => Err(DomainError::InvalidStateTransition {
            from,
            action: action.as_str(),
        }),
    }
}

/// Title and start time are frozen once a session is done.
pub fn ensure_session_editable(status: SessionStatus) -> Result<(), DomainError> {
    if status == SessionStatus::Done {
        return Err(DomainError::SessionReadonly);
    }
    Ok(())
}

pub fn is_structure_locked(attachment_count: i64, is_admin_unlocked: bool) -> bool {
    attachment_count > 0 && !is_admin_unlocked
}

/// Team presets and the match list freeze once screenshots are attached.
pub fn ensure_structure_change_allowed(
    attachment_count: i64,
    is_admin_unlocked: bool,
) -> Result<(), DomainError> {
    if is_structure_locked(attachment_count, is_admin_unlocked) {
        return Err(DomainError::SessionLocked);
    }
    Ok(())
}

/// A result is confirmed exactly once, from DRAFT.
pub fn ensure_match_confirmable(
    status: MatchStatus,
    is_confirmed: bool,
) -> Result<(), DomainError> {
    if is_confirmed || status != MatchStatus::Draft {
        return Err(DomainError::InvalidMatchState);
    }
    Ok(())
}

pub fn ensure_match_deletable(is_confirmed: bool) -> Result<(), DomainError> {
    if is_confirmed {
        return Err(DomainError::ConfirmedMatchUndeletable);
    }
    Ok(())
}

/// Returns the new `is_archived` flag.
pub fn archive_friend(is_archived: bool) -> Result<bool, DomainError> {
    if is_archived {
        return Err(DomainError::FriendAlreadyArchived);
    }
    Ok(true)
}

pub fn restore_friend(is_archived: bool) -> Result<bool, DomainError> {
    if !is_archived {
        return Err(DomainError::FriendNotArchived);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_follows_the_lifecycle() {
        let confirmed = session_transition(SessionStatus::Scheduled, SessionAction::Confirm);
        assert_eq!(confirmed, Ok(SessionStatus::Confirmed));
        let done = session_transition(SessionStatus::Confirmed, SessionAction::MarkDone);
        assert_eq!(done, Ok(SessionStatus::Done));
        let reopened = session_transition(SessionStatus::Done, SessionAction::Reopen);
        assert_eq!(reopened, Ok(SessionStatus::Confirmed));
    }

    #[test]
    fn session_rejects_every_other_transition() {
        let allowed = [
            (SessionStatus::Scheduled, SessionAction::Confirm),
            (SessionStatus::Confirmed, SessionAction::MarkDone),
            (SessionStatus::Done, SessionAction::Reopen),
        ];
        for from in SessionStatus::ALL {
            for action in [
                SessionAction::Confirm,
                SessionAction::MarkDone,
                SessionAction::Reopen,
            ] {
                if allowed.contains(&(*from, action)) {
                    continue;
                }
                let err = session_transition(*from, action).unwrap_err();
                assert_eq!(err.code(), "INVALID_STATE_TRANSITION", "{from:?} {action:?}");
                assert_eq!(err.status(), 400);
            }
        }
    }

    #[test]
    fn done_session_is_readonly() {
        assert_eq!(
            ensure_session_editable(SessionStatus::Done),
            Err(DomainError::SessionReadonly)
        );
        assert!(ensure_session_editable(SessionStatus::Confirmed).is_ok());
    }

    #[test]
    fn attachments_lock_structure_unless_admin_unlocked() {
        assert!(ensure_structure_change_allowed(0, false).is_ok());
        assert_eq!(
            ensure_structure_change_allowed(1, false),
            Err(DomainError::SessionLocked)
        );
        assert!(ensure_structure_change_allowed(3, true).is_ok());
    }

    #[test]
    fn match_confirms_once_from_draft() {
        assert!(ensure_match_confirmable(MatchStatus::Draft, false).is_ok());
        let err = ensure_match_confirmable(MatchStatus::Completed, true).unwrap_err();
        assert_eq!(err.code(), "INVALID_MATCH_STATE");
        assert_eq!(err.status(), 400);
        assert!(ensure_match_confirmable(MatchStatus::Draft, true).is_err());
    }

    #[test]
    fn confirmed_match_is_undeletable() {
        assert!(ensure_match_deletable(false).is_ok());
        assert_eq!(
            ensure_match_deletable(true),
            Err(DomainError::ConfirmedMatchUndeletable)
        );
    }

    #[test]
    fn archive_then_restore_returns_to_active() {
        let archived = archive_friend(false).unwrap();
        assert!(archived);
        assert_eq!(archive_friend(archived), Err(DomainError::FriendAlreadyArchived));
        let restored = restore_friend(archived).unwrap();
        assert!(!restored);
        assert_eq!(restore_friend(restored), Err(DomainError::FriendNotArchived));
    }
}
