//! Blocking client for a Google-Maps-compatible routing provider.
//!
//! Two endpoints are exposed: Directions (distance, duration, polyline, bounds
//! and steps) and Distance Matrix (distance and duration only). The
//! orchestrator measures through Directions; `distance_matrix` is a standalone
//! API for summary-only lookups. Every failure is
//! returned as a classified [`MapServiceError`](super::MapServiceError) so the
//! orchestrator can decide on the fallback without inspecting HTTP details.

mod client;
mod parser;
mod response;


pub use client::MapServiceClient;
