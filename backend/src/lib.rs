//! Social networking backend: accounts, posts, comments, likes, follows and
//! a personalised feed behind a JSON HTTP API.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, services
//! and ports; [`inbound`] adapts HTTP requests onto driving ports;
//! [`outbound`] implements driven ports against PostgreSQL and crypto
//! primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware.
pub use middleware::Trace;
