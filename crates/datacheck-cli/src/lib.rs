//! CLI library components for datacheck.

pub mod exit;
pub mod logging;
