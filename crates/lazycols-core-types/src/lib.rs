//! Core types shared across lazycols facilities
//!
//! This crate provides the canonical field keys and event names used by
//! both the error facility and the logging macros, so every crate in the
//! workspace emits the same structured shape.

pub mod schema;
