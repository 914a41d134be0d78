//! Domain models for the code owners registry.
//!
//! - [`Team`]: a named group of [`Member`]s responsible for a set of owned paths.
//!   The name is the durable key; the `id` only lives as long as the process.
//! - [`Member`]: a developer, identified by username.
//! - [`OwnerMatch`]: one team answering a path resolution query.

mod member;
mod owner;
mod team;

pub use member::*;
pub use owner::*;
pub use team::*;
