//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserProfile, Username};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_helpers::{PROFILE_SELECT, count, page_bounds, profile_from_row};
use super::models::{CountRow, CredentialsRow, NewUserRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            password_hash,
            date_joined: user.date_joined,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match constraint_violation(&error) {
                Some(ConstraintViolation::Unique) => {
                    UserPersistenceError::duplicate_username(user.username.as_ref())
                }
                _ => map_diesel_error(error),
            })
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(lower(users::username).eq(lower(username.as_ref()))),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialsRow> = users::table
            .filter(lower(users::username).eq(lower(username)))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::from(row.id),
            password_hash: row.password_hash,
        }))
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = diesel::sql_query(format!("{PROFILE_SELECT} WHERE u.id = $1"))
            .bind::<SqlUuid, _>(*id.as_uuid())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().next().map(profile_from_row))
    }

    async fn list_profiles(
        &self,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, UserPersistenceError> {
        let (limit, offset) = page_bounds(page);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = diesel::sql_query(format!(
            "{PROFILE_SELECT} ORDER BY u.date_joined ASC, u.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(offset)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        let total: CountRow = diesel::sql_query("SELECT COUNT(*) AS total FROM users")
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(profile_from_row).collect(),
            count(total.total),
            page,
        ))
    }
}
