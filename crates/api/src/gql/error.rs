//! Domain errors surfaced as GraphQL errors.
//!
//! async-graphql has a blanket `impl<T: Display> From<T> for Error`, which
//! would drop the code and status, so domain results are converted explicitly
//! through [`ResultExt::gql_err`]. The resulting error carries
//! `extensions { code, statusCode }` and, for validation failures, `fields`.

use async_graphql::ErrorExtensions;

use crate::domain::DomainError;

impl ErrorExtensions for DomainError {
    fn extend(&self) -> async_graphql::Error {
        if let DomainError::Internal(detail) = self {
            // Log the real error server-side; clients get the generic message
            tracing::error!("Internal error: {detail}");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            e.set("statusCode", i32::from(self.status()));
            if let DomainError::Validation(errors) = self {
                if let Ok(fields) = async_graphql::to_value(errors.fields()) {
                    e.set("fields", fields);
                }
            }
        })
    }
}

/// Converts any result whose error becomes a [`DomainError`] into
/// `async_graphql::Result<T>` with extensions.
///
/// Usage: `service::confirm(&state.db, &auth, id).await.gql_err()?`
pub trait ResultExt<T> {
    fn gql_err(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<DomainError>> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::Value;

    use super::*;
    use crate::domain::ValidationErrors;

    #[test]
    fn extensions_carry_code_and_status() {
        let err = Err::<(), _>(DomainError::MatchNotFound).gql_err().unwrap_err();
        assert_eq!(err.message, "Match not found");
        let ext = err.extensions.expect("extensions");
        assert_eq!(ext.get("code"), Some(&Value::from("MATCH_NOT_FOUND")));
        assert_eq!(ext.get("statusCode"), Some(&Value::from(404)));
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("displayName", "must not be empty");
        let err = Err::<(), _>(errors).gql_err().unwrap_err();
        let ext = err.extensions.expect("extensions");
        assert_eq!(ext.get("code"), Some(&Value::from("VALIDATION_ERROR")));
        let fields = serde_json::to_value(ext.get("fields").expect("fields")).unwrap();
        assert_eq!(
            fields,
            serde_json::json!([{ "field": "displayName", "message": "must not be empty" }])
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = Err::<(), _>(sqlx::Error::PoolTimedOut).gql_err().unwrap_err();
        assert_eq!(err.message, "Internal server error");
    }
}
