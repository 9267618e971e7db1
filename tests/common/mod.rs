//! Common test utilities for the NWP importers.
//!
//! This module provides shared fixtures and assertions for the integration
//! tests.

pub mod assertions;
pub mod test_data;
