//! Actix middleware applied to every request.
//!
//! [`Trace`] scopes a fresh trace id around each request and logs its
//! outcome.

pub mod trace;

pub use trace::Trace;
