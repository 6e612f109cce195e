//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The
//! case-insensitive username index and the self-follow CHECK live only in SQL.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display-cased login name, unique on `lower(username)`.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Registration timestamp; orders the user directory.
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Top-level posts.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        body -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments attached to a post.
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        body -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per user per liked post.
    likes (id) {
        id -> Uuid,
        user_id -> Uuid,
        post_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    follows (id) {
        id -> Uuid,
        follower_id -> Uuid,
        following_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(likes -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, comments, likes, follows);
