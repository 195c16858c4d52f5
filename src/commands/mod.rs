//! Command implementations, one module per entry point.

pub mod scan;
