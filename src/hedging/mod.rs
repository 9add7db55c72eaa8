//! Strategy-level aggregation and the scenario risk matrix.

pub mod aggregator;
pub mod risk_matrix;
