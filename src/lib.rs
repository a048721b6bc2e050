//! Registrar: user signup and lookup microservice.
//!
//! Remote callers create users (with their profile) and look them up by
//! address over a TCP message-pattern transport. Records live in
//! `PostgreSQL`, accessed through Diesel.
//!
//! # Architecture
//!
//! Registrar follows hexagonal architecture principles:
//!
//! - **Domain**: validated user values with no infrastructure dependencies
//! - **Ports**: the [`user::ports::UserRepository`] contract
//! - **Adapters**: `PostgreSQL` and in-memory repositories
//!
//! # Modules
//!
//! - [`user`]: user domain, repository port, adapters and service
//! - [`database`]: connection pool lifecycle and shutdown hook
//! - [`transport`]: framing, packets, server, client and call dispatch
//! - [`config`]: environment-driven settings
//! - [`app`]: composition root
//! - [`telemetry`]: logging setup

pub mod app;
pub mod config;
pub mod database;
pub mod telemetry;
pub mod transport;
pub mod user;
