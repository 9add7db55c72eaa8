//! Synthetic market data generation.

pub mod synthetic;
