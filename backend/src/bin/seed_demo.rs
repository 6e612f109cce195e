//! Populate the database with demo users, follows, posts, comments and likes.
//!
//! Users, follows and likes are idempotent: rerunning logs into existing
//! demo accounts and leaves existing relations alone. Each run adds a fresh
//! batch of posts and comments.

use std::io;
use std::sync::Arc;

use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use social::domain::ports::{
    CommentCommand, FollowCommand, LoginService, PostCommand, RegistrationService,
};
use social::domain::{
    AccountService, CommentBody, CommentService, Error, FollowService, LoginCredentials,
    PostBody, PostService, Registration, UserId,
};
use social::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselFollowRepository, DieselLikeRepository,
    DieselPostRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use social::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use social::settings::AppSettings;

const USERNAMES: [&str; 5] = ["alice", "bob", "charlie", "diana", "eve"];
const PASSWORD: &str = "password123";
const FOLLOW_PROBABILITY: f64 = 0.5;
const LIKE_PROBABILITY: f64 = 0.3;

const POST_LINES: [&str; 8] = [
    "Just finished a long run by the river.",
    "Anyone else trying the new bakery on Main Street?",
    "Reading a great book on distributed systems this week.",
    "Coffee first, opinions later.",
    "Weekend plans: absolutely nothing, and I am thrilled.",
    "Shipped a feature today. Time for a nap.",
    "Rainy days are for soup and old films.",
    "Hot take: tabs versus spaces does not matter.",
];

const COMMENT_LINES: [&str; 6] = [
    "Love this!",
    "Totally agree.",
    "Tell me more.",
    "Ha, same here.",
    "Great point.",
    "Not sure about that one.",
];

struct Services {
    accounts: Arc<dyn AccountPorts>,
    posts: Arc<dyn PostCommand>,
    comments: Arc<dyn CommentCommand>,
    follows: Arc<dyn FollowCommand>,
}

trait AccountPorts: RegistrationService + LoginService {}

impl<T: RegistrationService + LoginService> AccountPorts for T {}

fn build_services(pool: &DbPool) -> Services {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let accounts = AccountService::new(
        Arc::clone(&users),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenCodec::ephemeral(
            TimeDelta::minutes(5),
            Arc::clone(&clock),
        )),
        Arc::clone(&clock),
    );
    Services {
        accounts: Arc::new(accounts),
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
            users,
            clock,
        )),
    }
}

fn seed_error(err: Error) -> io::Error {
    io::Error::other(err.to_string())
}

async fn ensure_user(services: &Services, username: &str) -> Result<UserId, Error> {
    let registration = Registration::try_from_parts(username, PASSWORD)
        .map_err(|err| Error::internal(err.to_string()))?;
    match services.accounts.register(registration).await {
        Ok(user) => {
            info!(%username, "demo user created");
            Ok(user.id)
        }
        Err(err) if err.details().is_some_and(|d| d["code"] == "duplicate_username") => {
            let credentials = LoginCredentials::try_from_parts(username, PASSWORD)
                .map_err(|err| Error::internal(err.to_string()))?;
            let token = services.accounts.login(&credentials).await?;
            info!(%username, "demo user already present");
            Ok(token.user_id)
        }
        Err(err) => Err(err),
    }
}

async fn seed(services: &Services, rng: &mut SmallRng) -> Result<(), Error> {
    let mut users = Vec::with_capacity(USERNAMES.len());
    for username in USERNAMES {
        users.push(ensure_user(services, username).await?);
    }

    for follower in &users {
        for target in users.iter().filter(|target| *target != follower) {
            if rng.gen_bool(FOLLOW_PROBABILITY) {
                services.follows.follow(follower, target).await?;
            }
        }
    }

    let post_count = rng.gen_range(10..=20);
    let mut post_ids = Vec::with_capacity(post_count);
    for _ in 0..post_count {
        let (Some(author), Some(line)) = (users.choose(rng), POST_LINES.choose(rng)) else {
            continue;
        };
        let body = PostBody::new(*line).map_err(|err| Error::internal(err.to_string()))?;
        post_ids.push(services.posts.create(author, body).await?.id);
    }

    let mut comment_total = 0_usize;
    for post_id in &post_ids {
        for _ in 0..rng.gen_range(0..=3) {
            let (Some(author), Some(line)) = (users.choose(rng), COMMENT_LINES.choose(rng)) else {
                continue;
            };
            let body = CommentBody::new(*line).map_err(|err| Error::internal(err.to_string()))?;
            services.comments.create(author, post_id, body).await?;
            comment_total += 1;
        }
    }

    let mut like_total = 0_usize;
    for post_id in &post_ids {
        for user in &users {
            if rng.gen_bool(LIKE_PROBABILITY) {
                services.posts.like(user, post_id).await?;
                like_total += 1;
            }
        }
    }

    info!(
        users = users.len(),
        posts = post_ids.len(),
        comments = comment_total,
        likes = like_total,
        "demo data seeded"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let database_url = settings.database_url().map_err(io::Error::other)?;
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(io::Error::other)?;

    let services = build_services(&pool);
    let mut rng = SmallRng::from_entropy();
    seed(&services, &mut rng).await.map_err(seed_error)
}
