//! Shared test utilities for the autovars workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`] - [`TestTree`] builder for on-disk inventory layouts
//! - [`layouts`] - canned layouts used across crate test suites

pub mod layouts;
pub mod tree;

pub use tree::TestTree;
