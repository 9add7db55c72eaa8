//! Historical rate ingestion, monthly statistics, backtesting and export.

pub mod backtest;
pub mod export;
pub mod series;
pub mod stats;
