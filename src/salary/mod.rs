//! Salary normalization and aggregation.
//!
//! - estimator:  one salary record -> one optional estimate
//! - aggregator: many estimates -> found / processed / average
//!
//! Nothing in here performs I/O. Providers and the collector feed it.

pub mod aggregator;
pub mod estimator;

pub use aggregator::{CategoryAggregator, aggregate};
pub use estimator::estimate;
