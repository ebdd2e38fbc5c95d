//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: Redis and in-memory implementations of `WeatherCache`
//! - **openweather**: reqwest client implementing `WeatherSource`
//! - **password**: Argon2id implementation of `PasswordHasher`
//! - **persistence**: Diesel repositories for favourite locations and accounts
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod cache;
pub mod openweather;
pub mod password;
pub mod persistence;
