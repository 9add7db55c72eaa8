//! Option pricing and barrier resolution for individual legs.

pub mod barrier;
pub mod normal;
pub mod option_pricer;
