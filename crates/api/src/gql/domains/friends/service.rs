use sqlx::PgPool;
use uuid::Uuid;

use super::types::FriendPatch;
use crate::domain::{lifecycle, DomainError};
use infra::models::FriendRow;
use infra::repos::{friends, CreateFriend, FriendFilter};

pub async fn list_friends(pool: &PgPool, filter: FriendFilter) -> Result<Vec<FriendRow>, DomainError> {
    Ok(friends::list(pool, &filter).await?)
}

pub async fn create_friend(pool: &PgPool, data: CreateFriend) -> Result<FriendRow, DomainError> {
    let friend = friends::create(pool, data).await?;
    tracing::info!(friend_id = %friend.id, "friend created");
    Ok(friend)
}

pub async fn update_friend(
    pool: &PgPool,
    friend_id: Uuid,
    patch: FriendPatch,
) -> Result<FriendRow, DomainError> {
    let mut tx = pool.begin().await?;

    let current = friends::get_by_id_for_update(&mut *tx, friend_id)
        .await?
        .ok_or(DomainError::FriendNotFound)?;

    let updated = friends::update(&mut *tx, friend_id, patch.apply(&current))
        .await?
        .ok_or(DomainError::FriendNotFound)?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn archive_friend(pool: &PgPool, friend_id: Uuid) -> Result<FriendRow, DomainError> {
    set_archived(pool, friend_id, lifecycle::archive_friend).await
}

pub async fn restore_friend(pool: &PgPool, friend_id: Uuid) -> Result<FriendRow, DomainError> {
    set_archived(pool, friend_id, lifecycle::restore_friend).await
}

async fn set_archived(
    pool: &PgPool,
    friend_id: Uuid,
    transition: fn(bool) -> Result<bool, DomainError>,
) -> Result<FriendRow, DomainError> {
    let mut tx = pool.begin().await?;

    let current = friends::get_by_id_for_update(&mut *tx, friend_id)
        .await?
        .ok_or(DomainError::FriendNotFound)?;
    let is_archived = transition(current.is_archived)?;

    let updated = friends::set_archived(&mut *tx, friend_id, is_archived)
        .await?
        .ok_or(DomainError::FriendNotFound)?;

    tx.commit().await?;
    tracing::info!(friend_id = %friend_id, is_archived, "friend archive state changed");
    Ok(updated)
}
