//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentBody, CommentId, CommentView, PostId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{COMMENT_VIEW_SELECT, comment_view_from_row, count, page_bounds};
use super::models::{CommentRow, CommentUpdate, CommentViewRow, CountRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let body = CommentBody::new(row.body).map_err(|err| {
        CommentRepositoryError::query(format!(
            "stored comment {} has an invalid body: {err}",
            row.id
        ))
    })?;
    Ok(Comment {
        id: CommentId::from(row.id),
        post_id: PostId::from(row.post_id),
        author_id: UserId::from(row.author_id),
        body,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CommentRow {
            id: *comment.id.as_uuid(),
            post_id: *comment.post_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            body: comment.body.as_ref().to_owned(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = comments::table
            .find(*id.as_uuid())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_comment).transpose()
    }

    async fn update(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CommentUpdate {
            body: comment.body.as_ref(),
            updated_at: comment.updated_at,
        };
        diesel::update(comments::table.find(*comment.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(comments::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_view(
        &self,
        id: &CommentId,
    ) -> Result<Option<CommentView>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentViewRow> =
            diesel::sql_query(format!("{COMMENT_VIEW_SELECT} WHERE c.id = $1"))
                .bind::<SqlUuid, _>(*id.as_uuid())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(rows.into_iter().next().map(comment_view_from_row))
    }

    async fn list_views_for_post(
        &self,
        post_id: &PostId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, CommentRepositoryError> {
        let (limit, offset) = page_bounds(page);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentViewRow> = diesel::sql_query(format!(
            "{COMMENT_VIEW_SELECT} WHERE c.post_id = $1 \
             ORDER BY c.created_at ASC, c.id ASC LIMIT $2 OFFSET $3"
        ))
        .bind::<SqlUuid, _>(*post_id.as_uuid())
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(offset)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        let total: CountRow =
            diesel::sql_query("SELECT COUNT(*) AS total FROM comments WHERE post_id = $1")
                .bind::<SqlUuid, _>(*post_id.as_uuid())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(comment_view_from_row).collect(),
            count(total.total),
            page,
        ))
    }
}
