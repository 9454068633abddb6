pub mod config;
pub mod contract;
pub mod discount;
pub mod error;
pub mod geo;
pub mod orchestrator;
pub mod pricing;
pub mod routing;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
