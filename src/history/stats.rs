use crate::core::rate_math::{annualized_volatility, month_key};
use crate::history::series::HistoricalDataPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one calendar month of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// `YYYY-MM`
    pub month: String,
    pub avg_price: f64,
    /// Annualized; `None` with fewer than two observations in the month.
    pub volatility: Option<f64>,
    pub observations: usize,
}

impl MonthlyStats {
    /// Calendar year of the bucket.
    pub fn year(&self) -> Option<i32> {
        self.month.get(..4)?.parse().ok()
    }

    /// Months since year 0, so the distance between two buckets is a
    /// subtraction.
    pub fn month_ordinal(&self) -> Option<i32> {
        let month: i32 = self.month.get(5..7)?.parse().ok()?;
        Some(self.year()? * 12 + month - 1)
    }
}

/// Bucket points by calendar month, in chronological order.
///
/// Within a month, volatility is computed over the points in date order.
pub fn monthly_stats(points: &[HistoricalDataPoint]) -> Vec<MonthlyStats> {
    let mut buckets: BTreeMap<String, Vec<&HistoricalDataPoint>> = BTreeMap::new();
    for point in points {
        buckets.entry(month_key(&point.date)).or_default().push(point);
    }

    buckets
        .into_iter()
        .map(|(month, mut bucket)| {
            bucket.sort_by_key(|p| p.date);
            let prices: Vec<f64> = bucket.iter().map(|p| p.price).collect();
            MonthlyStats {
                month,
                avg_price: prices.iter().sum::<f64>() / prices.len() as f64,
                volatility: annualized_volatility(&prices),
                observations: prices.len(),
            }
        })
        .collect()
}
