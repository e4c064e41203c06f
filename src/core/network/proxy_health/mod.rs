//! Proxy Health Evaluation Module
//!
//! This module provides the tiered proxy evaluation engine with:
//! - A shared probe primitive over an injectable HTTP client
//! - Pure basic/business response classification
//! - Sequential per-candidate evaluation with business endpoint fallback
//! - Tiered best-candidate selection with response-time tie-break

pub mod classify;
pub mod client;
pub mod evaluator;
pub mod probe;
pub mod selector;
pub mod url;

// Re-export public API
pub use classify::{classify_basic, classify_business, Verdict};
pub use client::{IsahcProbeClient, ProbeClient, ProbeMethod, ProbeRequest, ProbeResponse};
pub use evaluator::ProxyEvaluator;
pub use probe::run_probe;
pub use selector::select;
pub use url::{join_endpoint, normalize_base_url, shorten_url, validate_candidate_url};
