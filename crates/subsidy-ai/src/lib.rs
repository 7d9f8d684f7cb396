//! Scoring core for the subsidy application drafting service.
//!
//! The library owns the numeric pipeline that the drafting product depends
//! on: feature extraction from application inputs, adoption probability
//! prediction (trained ensemble or deterministic fallback), heuristic quality
//! evaluation of generated text, and the offline training job that produces
//! the persisted model artifacts.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
