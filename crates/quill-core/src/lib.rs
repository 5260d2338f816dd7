//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, publishing and tag-sync rules, and the ports the infrastructure
//! implements. Nothing in here talks to a database.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
