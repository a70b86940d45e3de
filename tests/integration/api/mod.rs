//! API integration tests
//!
//! Integration tests for all API endpoints

mod chat_test;
mod resilience_test;
