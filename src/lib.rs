//! Team ownership registry for repository paths.
//!
//! Teams, their members and the paths they own are kept in a single JSON
//! record file. [`service::OwnershipService`] loads and saves that file,
//! [`registry::Registry`] holds an opened set of teams while they are edited,
//! and [`resolve::resolve_owners`] answers "who owns this path?".

pub mod codec;
pub mod config;
pub mod gitlab;
pub mod models;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod review;
pub mod service;
