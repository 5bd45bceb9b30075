//! Market data access: the provider seam, the Yahoo Finance adapter and the
//! circuit breaker that protects it.

pub mod circuit_breaker;
pub mod provider;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use provider::{DataError, DataProvider};
pub use yahoo::YahooProvider;
