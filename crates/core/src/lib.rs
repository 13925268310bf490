//! CrowdLocal Core - Shared types library.
//!
//! This crate provides common types used across all CrowdLocal components:
//! - `api` - REST API server for campaigns, funding, and authentication
//! - `cli` - Command-line tools for migrations and database seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
