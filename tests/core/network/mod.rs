//! Network module tests
//!
//! Probe classification, candidate evaluation, selection, diagnostics and
//! console rendering.

pub mod diagnostic_tests;
