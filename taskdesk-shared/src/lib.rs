//! # TaskDesk Shared Library
//!
//! This crate contains the domain core shared by the TaskDesk server binaries:
//! data models, authentication primitives, the authorization policy engine,
//! the task lifecycle validator, and role-based query scoping.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations (users, tasks)
//! - `auth`: Password hashing, JWT tokens, middleware context, policy engine
//! - `lifecycle`: Task status transition validation
//! - `scope`: Role-scoped visibility queries and dashboard summaries
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod lifecycle;
pub mod models;
pub mod scope;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
