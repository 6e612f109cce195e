//! Shared helpers for backend integration tests.
//!
//! Database-backed suites read `SOCIAL_TEST_DATABASE_URL`. When it is unset
//! they print a skip marker and return early so `cargo test` stays green on
//! machines without PostgreSQL.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use social::domain::{
    AccountService, CommentService, FollowService, PostService, UserDirectoryService,
};
use social::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselFollowRepository, DieselLikeRepository,
    DieselPostRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use social::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use tokio::sync::OnceCell;
use uuid::Uuid;

const DATABASE_URL_VAR: &str = "SOCIAL_TEST_DATABASE_URL";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Return the test database URL, printing a skip marker when absent.
pub fn test_database_url() -> Option<String> {
    match std::env::var(DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {DATABASE_URL_VAR} is not set");
            None
        }
    }
}

/// Unique username so suites can share one database.
pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..12])
}

type Accounts = AccountService<DieselUserRepository, Argon2PasswordHasher, JwtTokenCodec>;

/// Domain services wired to PostgreSQL repositories.
pub struct DieselServices {
    pub pool: DbPool,
    pub accounts: Arc<Accounts>,
    pub posts: Arc<PostService<DieselPostRepository, DieselLikeRepository>>,
    pub comments: Arc<CommentService<DieselCommentRepository, DieselPostRepository>>,
    pub follows: Arc<FollowService<DieselFollowRepository, DieselUserRepository>>,
    pub users: Arc<UserDirectoryService<DieselUserRepository>>,
}

/// Apply migrations once per test binary and build services over a pool.
pub async fn diesel_services(database_url: &str) -> DieselServices {
    MIGRATED
        .get_or_init(|| async {
            run_pending_migrations(database_url)
                .await
                .expect("migrations apply");
        })
        .await;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(4))
        .await
        .expect("pool builds");
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let hasher = Argon2PasswordHasher::with_params(256, 1, 1).expect("cheap argon2 parameters");
    DieselServices {
        accounts: Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::new(hasher),
            Arc::new(JwtTokenCodec::new(
                b"integration-secret",
                chrono::TimeDelta::minutes(5),
                Arc::clone(&clock),
            )),
            Arc::clone(&clock),
        )),
        posts: Arc::new(PostService::new(
            Arc::clone(&posts),
            Arc::new(DieselLikeRepository::new(pool.clone(), Arc::clone(&clock))),
            Arc::clone(&clock),
        )),
        comments: Arc::new(CommentService::new(
            Arc::new(DieselCommentRepository::new(pool.clone())),
            posts,
            Arc::clone(&clock),
        )),
        follows: Arc::new(FollowService::new(
            Arc::new(DieselFollowRepository::new(pool.clone())),
            Arc::clone(&users),
            clock,
        )),
        users: Arc::new(UserDirectoryService::new(users)),
        pool,
    }
}
