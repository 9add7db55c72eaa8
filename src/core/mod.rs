//! Data model and numeric foundations: strategy legs, market parameters,
//! errors and rate helpers.

pub mod component;
pub mod error;
pub mod market;
pub mod rate_math;
