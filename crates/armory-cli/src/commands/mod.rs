//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod cache_status;
pub mod classify;
pub mod records;
pub mod resolve;
pub mod sync;
