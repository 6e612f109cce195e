//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Writes go through the typed DSL; annotated reads use `sql_query` with the
//! shared projections from `diesel_helpers`. Ties on `created_at` fall back to
//! descending id so paging stays stable.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Post, PostBody, PostId, PostView, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{
    FEED_FILTER, POST_VIEW_SELECT, count, page_bounds, post_view_from_row,
};
use super::models::{CountRow, PostRow, PostUpdate, PostViewRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.id DESC";

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let body = PostBody::new(row.body).map_err(|err| {
        PostRepositoryError::query(format!("stored post {} has an invalid body: {err}", row.id))
    })?;
    Ok(Post {
        id: PostId::from(row.id),
        author_id: UserId::from(row.author_id),
        body,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn post_to_row(post: &Post) -> PostRow {
    PostRow {
        id: *post.id.as_uuid(),
        author_id: *post.author_id.as_uuid(),
        body: post.body.as_ref().to_owned(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(posts::table)
            .values(&post_to_row(post))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PostRow> = posts::table
            .find(*id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_post).transpose()
    }

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PostUpdate {
            body: post.body.as_ref(),
            updated_at: post.updated_at,
        };
        diesel::update(posts::table.find(*post.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(posts::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_view(&self, id: &PostId) -> Result<Option<PostView>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostViewRow> = diesel::sql_query(format!("{POST_VIEW_SELECT} WHERE p.id = $1"))
            .bind::<SqlUuid, _>(*id.as_uuid())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().next().map(post_view_from_row))
    }

    async fn list_views(&self, page: PageRequest) -> Result<Page<PostView>, PostRepositoryError> {
        let (limit, offset) = page_bounds(page);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostViewRow> =
            diesel::sql_query(format!("{POST_VIEW_SELECT} {NEWEST_FIRST} LIMIT $1 OFFSET $2"))
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        let total: CountRow = diesel::sql_query("SELECT COUNT(*) AS total FROM posts")
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(post_view_from_row).collect(),
            count(total.total),
            page,
        ))
    }

    async fn feed_views(
        &self,
        viewer: &UserId,
        page: PageRequest,
    ) -> Result<Page<PostView>, PostRepositoryError> {
        let (limit, offset) = page_bounds(page);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostViewRow> = diesel::sql_query(format!(
            "{POST_VIEW_SELECT} {FEED_FILTER} {NEWEST_FIRST} LIMIT $2 OFFSET $3"
        ))
        .bind::<SqlUuid, _>(*viewer.as_uuid())
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(offset)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        let total: CountRow =
            diesel::sql_query(format!("SELECT COUNT(*) AS total FROM posts p {FEED_FILTER}"))
                .bind::<SqlUuid, _>(*viewer.as_uuid())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(post_view_from_row).collect(),
            count(total.total),
            page,
        ))
    }
}
