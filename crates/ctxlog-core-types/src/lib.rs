//! Core types shared across ctxlog facilities
//!
//! This crate provides foundational types used by both the logging
//! backends and the context machinery:
//!
//! - **Context**: immutable, request-scoped value bag
//! - **Schema constants**: canonical field keys and key sentinels

pub mod context;
pub mod schema;

pub use context::Context;
