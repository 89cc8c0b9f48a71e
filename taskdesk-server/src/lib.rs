//! # TaskDesk Server Library
//!
//! Core functionality for the TaskDesk HTTP server: a role-based task
//! tracker exposing a JSON API and a server-rendered admin panel.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: configuration management
//! - `error`: error handling and HTTP response mapping
//! - `routes`: JSON API route handlers
//! - `admin`: server-rendered admin panel (pages, actions, sessions)
//! - `bootstrap`: first-run superadmin creation

pub mod admin;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;
