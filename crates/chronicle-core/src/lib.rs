//! # Chronicle Core
//!
//! The domain layer of the Chronicle blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the entities, the visibility/ownership policies, and the ports the
//! infrastructure must implement.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;

pub use error::RepoError;
pub use pagination::{PAGE_SIZE, Page};
