//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{FollowRepository, FollowRepositoryError};
use crate::domain::{Follow, FollowOutcome, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::FollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Insert rounds tolerated when an unfollow keeps deleting the conflicting row.
const INSERT_ATTEMPTS: usize = 2;

/// Diesel-backed implementation of the `FollowRepository` port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    map_basic_pool_error(error, FollowRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    if constraint_violation(&error) == Some(ConstraintViolation::ForeignKey) {
        return FollowRepositoryError::missing_reference("followed user no longer exists");
    }
    map_basic_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

fn row_to_follow(row: FollowRow) -> Follow {
    Follow {
        id: row.id,
        follower_id: UserId::from(row.follower_id),
        following_id: UserId::from(row.following_id),
        created_at: row.created_at,
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert_if_absent(
        &self,
        follow: &Follow,
    ) -> Result<FollowOutcome<Follow>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = FollowRow {
            id: follow.id,
            follower_id: *follow.follower_id.as_uuid(),
            following_id: *follow.following_id.as_uuid(),
            created_at: follow.created_at,
        };
        for _ in 0..INSERT_ATTEMPTS {
            let inserted = diesel::insert_into(follows::table)
                .values(&row)
                .on_conflict((follows::follower_id, follows::following_id))
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            if inserted > 0 {
                return Ok(FollowOutcome::Created(follow.clone()));
            }

            let existing: Option<FollowRow> = follows::table
                .filter(follows::follower_id.eq(row.follower_id))
                .filter(follows::following_id.eq(row.following_id))
                .select(FollowRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
            if let Some(existing) = existing {
                return Ok(FollowOutcome::Existing(row_to_follow(existing)));
            }
            debug!(follower_id = %follow.follower_id, "follow removed during insert; retrying");
        }
        Err(FollowRepositoryError::query("follow removed during insert"))
    }

    async fn remove(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(*follower_id.as_uuid()))
                .filter(follows::following_id.eq(*following_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
