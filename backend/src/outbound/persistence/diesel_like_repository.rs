//! PostgreSQL-backed `LikeRepository` implementation using Diesel ORM.
//!
//! Inserts use `ON CONFLICT DO NOTHING` on `(user_id, post_id)` so a
//! concurrent duplicate reports "already liked" rather than an error.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{LikeRepository, LikeRepositoryError};
use crate::domain::{PostId, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::NewLikeRow;
use super::pool::{DbPool, PoolError};
use super::schema::likes;

/// Diesel-backed implementation of the `LikeRepository` port.
#[derive(Clone)]
pub struct DieselLikeRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselLikeRepository {
    /// Create a new repository; `clock` stamps `created_at` on new likes.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> LikeRepositoryError {
    map_basic_pool_error(error, LikeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LikeRepositoryError {
    if constraint_violation(&error) == Some(ConstraintViolation::ForeignKey) {
        return LikeRepositoryError::missing_reference("like target no longer exists");
    }
    map_basic_diesel_error(
        error,
        LikeRepositoryError::query,
        LikeRepositoryError::connection,
    )
}

#[async_trait]
impl LikeRepository for DieselLikeRepository {
    async fn insert_if_absent(
        &self,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<bool, LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLikeRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            post_id: *post_id.as_uuid(),
            created_at: self.clock.utc(),
        };
        let inserted = diesel::insert_into(likes::table)
            .values(&row)
            .on_conflict((likes::user_id, likes::post_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<bool, LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            likes::table
                .filter(likes::user_id.eq(*user_id.as_uuid()))
                .filter(likes::post_id.eq(*post_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
