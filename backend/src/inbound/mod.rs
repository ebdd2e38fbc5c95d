//! Inbound adapters translating external requests into domain service calls.
//!
//! [`http`] serves the REST API and [`graphql`] the GraphQL endpoint; both
//! share one service bundle and the session cookie.

pub mod graphql;
pub mod http;
