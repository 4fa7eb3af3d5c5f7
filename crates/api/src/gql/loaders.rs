use async_graphql::dataloader::{DataLoader, Loader};
use async_graphql::Context;
use infra::{db::Db, models::FriendRow, repos::friends};
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::gql::error::ResultExt;

// FriendLoader - batch load friends by ID for attendance, preset and match member rows
#[derive(Clone)]
pub struct FriendLoader {
    pool: Db,
}

impl FriendLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for FriendLoader {
    type Value = FriendRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = friends::get_by_ids(&pool, &ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

/// One friend through the request's [`FriendLoader`]. Rows reference friends
/// by foreign key, so a miss is reported as `FRIEND_NOT_FOUND`.
pub async fn load_friend(ctx: &Context<'_>, friend_id: Uuid) -> async_graphql::Result<FriendRow> {
    let loader = ctx.data::<DataLoader<FriendLoader>>()?;
    loader
        .load_one(friend_id)
        .await
        .map_err(|e| DomainError::Internal(format!("friend loader: {e}")))
        .and_then(|row| row.ok_or(DomainError::FriendNotFound))
        .gql_err()
}
