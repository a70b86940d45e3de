//! Integration tests
//!
//! Requests go through the full router built over the in-memory store.

mod api;
mod config_test;
