//! Test Module
//!
//! Cross-module test suites. Unit tests live next to their modules.
//!
//! ## Test Categories
//! - `engine_tests`: end-to-end engine scenarios and verdict properties
//! - `scoring_tests`: remote delegates against mock servers, fallback chain
//! - `service_tests`: validation, safe default, persistence and lookups
//! - `chaos_test`: concurrent submissions through slow and failing backends

pub mod scoring_tests;
