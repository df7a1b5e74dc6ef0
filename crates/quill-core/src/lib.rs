//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! Entities, ports and services; no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::Services;
