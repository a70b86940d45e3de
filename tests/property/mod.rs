//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify properties

mod credentials_proptest;
mod token_proptest;
mod validation_proptest;
