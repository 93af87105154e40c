//! Test doubles and fixtures.
//!
//! [`MockCatalog`] stands in for the real provider in unit and
//! integration tests; it is configured per test and records every query
//! it receives so tests can assert on traffic, not just results.

pub mod fixtures;
mod mock_catalog;

pub use mock_catalog::{MockCatalog, RecordedQuery};
