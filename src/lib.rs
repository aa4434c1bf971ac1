//! Tollgate - traffic control primitives for edge routing
//!
//! This crate provides two independent building blocks: a consistent hash
//! ring that assigns string keys to a changing set of nodes, and a family of
//! rate limiters that make immediate admit/deny decisions. Both are
//! synchronous, lock-protected and free of background work.

pub mod config;
pub mod error;
pub mod ratelimit;
pub mod ring;

pub use error::{Result, TollgateError};
