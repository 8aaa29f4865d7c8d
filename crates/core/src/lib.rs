//! Taskdeck Core - Shared types library.
//!
//! This crate provides common types used across all Taskdeck components:
//! - `server` - The multi-tenant HTTP API
//! - `cli` - Command-line tools for migrations, seeding, and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and subdomains,
//!   plus the role/status/plan enums shared by the server and CLI

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
