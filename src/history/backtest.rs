//! Replays a hedging strategy over historical months.
//!
//! Every observed month is one hedging period. A period matures the calendar
//! distance from the first observed month plus one, so a gap in the history
//! still leaves later months at their true maturity. The strategy is priced
//! once per period at the inception spot and settled against that month's
//! average rate.

use crate::core::component::StrategyComponent;
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::market::ForexParams;
use crate::hedging::aggregator::StrategyAggregator;
use crate::history::series::HistoricalSeries;
use crate::history::stats::MonthlyStats;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Three prices give two log returns, the fewest with a sample dispersion.
const MIN_VOLATILITY_OBSERVATIONS: usize = 3;

/// Backtest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestConfig {
    /// Inception spot; defaults to the first observation of the series.
    #[serde(default)]
    pub spot: Option<f64>,
    pub params: ForexParams,
    /// Percent of the volume hedged.
    pub coverage_ratio: f64,
    /// Notional spread evenly over the hedged months.
    pub total_volume: f64,
    /// Replace every option leg's volatility with the series' realized volatility.
    #[serde(default)]
    pub use_historical_volatility: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            spot: None,
            params: ForexParams::default(),
            coverage_ratio: 100.0,
            total_volume: 1_000_000.0,
            use_historical_volatility: false,
        }
    }
}

/// Result of one hedged month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexResult {
    /// Period label, `YYYY-MM`.
    pub date: String,
    pub time_to_maturity: f64,
    pub forward_rate: f64,
    pub real_rate: f64,
    pub monthly_volume: f64,
    pub premium_paid: f64,
    pub payoff_from_hedge: f64,
    pub hedged_revenue: f64,
    pub unhedged_revenue: f64,
    pub pnl_vs_unhedged: f64,
    pub effective_rate: f64,
}

impl ForexResult {
    pub fn year(&self) -> Option<i32> {
        self.date.get(..4)?.parse().ok()
    }
}

/// Totals over a set of months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub months: usize,
    pub hedged_revenue: f64,
    pub unhedged_revenue: f64,
    pub total_pnl: f64,
    pub total_premium: f64,
    /// `(unhedged - hedged) / unhedged * 100`; zero without unhedged revenue.
    pub cost_reduction_percent: f64,
}

impl PeriodSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ForexResult>) -> Self {
        let mut summary = PeriodSummary {
            months: 0,
            hedged_revenue: 0.0,
            unhedged_revenue: 0.0,
            total_pnl: 0.0,
            total_premium: 0.0,
            cost_reduction_percent: 0.0,
        };
        for result in results {
            summary.months += 1;
            summary.hedged_revenue += result.hedged_revenue;
            summary.unhedged_revenue += result.unhedged_revenue;
            summary.total_pnl += result.pnl_vs_unhedged;
            summary.total_premium += result.premium_paid;
        }
        if summary.unhedged_revenue != 0.0 {
            summary.cost_reduction_percent = (summary.unhedged_revenue - summary.hedged_revenue)
                / summary.unhedged_revenue
                * 100.0;
        }
        summary
    }
}

/// Summary of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub year: i32,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// Full output of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub monthly_stats: Vec<MonthlyStats>,
    pub results: Vec<ForexResult>,
    pub yearly: Vec<YearlySummary>,
    pub totals: PeriodSummary,
    /// Volatility used for the legs when historical volatility was requested.
    pub historical_volatility: Option<f64>,
}

/// Group monthly results by calendar year, in chronological order.
pub fn yearly_summaries(results: &[ForexResult]) -> Vec<YearlySummary> {
    let mut by_year: BTreeMap<i32, Vec<&ForexResult>> = BTreeMap::new();
    for result in results {
        match result.year() {
            Some(year) => by_year.entry(year).or_default().push(result),
            None => warn!("result dated '{}' has no year; left out of yearly summary", result.date),
        }
    }
    by_year
        .into_iter()
        .map(|(year, rows)| YearlySummary {
            year,
            summary: PeriodSummary::from_results(rows),
        })
        .collect()
}

/// Runs strategies over historical data.
pub struct Backtester;

impl Backtester {
    /// Backtest `components` over `series`.
    ///
    /// When `params.months_to_hedge` is non-zero only that many leading
    /// months are hedged; zero hedges every month of the series.
    pub fn run(
        components: &[StrategyComponent],
        series: &HistoricalSeries,
        config: &BacktestConfig,
    ) -> HedgeResult<BacktestReport> {
        let monthly_stats = series.monthly_stats();
        let first = series
            .first()
            .ok_or_else(|| HedgeError::configuration("historical series is empty"))?;
        if components.is_empty() {
            return Err(HedgeError::configuration("strategy has no components"));
        }
        for (index, component) in components.iter().enumerate() {
            component.validate(index)?;
        }

        let spot = config.spot.unwrap_or(first.price);
        if !spot.is_finite() || spot <= 0.0 {
            return Err(HedgeError::configuration(format!(
                "spot rate must be positive, got {}",
                spot
            )));
        }
        if !config.total_volume.is_finite() || config.total_volume < 0.0 {
            return Err(HedgeError::configuration(format!(
                "total volume must be non-negative, got {}",
                config.total_volume
            )));
        }
        if !config.coverage_ratio.is_finite() {
            return Err(HedgeError::configuration("coverage ratio must be finite"));
        }

        let (legs, historical_volatility) = Self::legs_for_run(components, series, config);

        let period_count = match config.params.months_to_hedge {
            0 => monthly_stats.len(),
            n => monthly_stats.len().min(n as usize),
        };
        let monthly_volume = config.total_volume / period_count as f64;
        debug!(
            "backtesting {} legs over {} of {} months, spot {}",
            legs.len(),
            period_count,
            monthly_stats.len(),
            spot
        );

        let first_month = monthly_stats.first().and_then(MonthlyStats::month_ordinal);
        let results: Vec<ForexResult> = monthly_stats[..period_count]
            .iter()
            .enumerate()
            .map(|(index, month)| {
                let elapsed = first_month
                    .zip(month.month_ordinal())
                    .map_or(index as i32, |(first, current)| current - first);
                let time_to_maturity = f64::from(elapsed + 1) / 12.0;
                Self::hedge_month(&legs, spot, config, time_to_maturity, month, monthly_volume)
            })
            .collect();

        let yearly = yearly_summaries(&results);
        let totals = PeriodSummary::from_results(&results);

        Ok(BacktestReport {
            monthly_stats,
            results,
            yearly,
            totals,
            historical_volatility,
        })
    }

    fn legs_for_run(
        components: &[StrategyComponent],
        series: &HistoricalSeries,
        config: &BacktestConfig,
    ) -> (Vec<StrategyComponent>, Option<f64>) {
        if !config.use_historical_volatility {
            return (components.to_vec(), None);
        }
        if series.len() < MIN_VOLATILITY_OBSERVATIONS {
            warn!(
                "historical volatility needs at least {} observations, got {}; keeping leg volatilities",
                MIN_VOLATILITY_OBSERVATIONS,
                series.len()
            );
            return (components.to_vec(), None);
        }
        match series.annualized_volatility() {
            Some(vol) => {
                let legs = components
                    .iter()
                    .map(|c| match c.kind.option_kind() {
                        Some(_) => c.clone().with_volatility(vol * 100.0),
                        None => c.clone(),
                    })
                    .collect();
                (legs, Some(vol))
            }
            None => {
                warn!("historical volatility unavailable; keeping leg volatilities");
                (components.to_vec(), None)
            }
        }
    }

    fn hedge_month(
        legs: &[StrategyComponent],
        spot: f64,
        config: &BacktestConfig,
        time_to_maturity: f64,
        month: &MonthlyStats,
        monthly_volume: f64,
    ) -> ForexResult {
        let aggregate = StrategyAggregator::aggregate_with_maturity(
            legs,
            spot,
            &config.params,
            config.coverage_ratio,
            time_to_maturity,
        );
        let outcome = aggregate.scenario(month.avg_price);

        let hedged_revenue = outcome.effective_rate * monthly_volume;
        let unhedged_revenue = month.avg_price * monthly_volume;

        ForexResult {
            date: month.month.clone(),
            time_to_maturity,
            forward_rate: config.params.forward_rate(spot, time_to_maturity),
            real_rate: month.avg_price,
            monthly_volume,
            premium_paid: outcome.premium * monthly_volume,
            payoff_from_hedge: outcome.payoff * monthly_volume,
            hedged_revenue,
            unhedged_revenue,
            pnl_vs_unhedged: hedged_revenue - unhedged_revenue,
            effective_rate: outcome.effective_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::{ComponentKind, StrikeType};
    use crate::history::series::HistoricalDataPoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(rows: &[(i32, u32, u32, f64)]) -> HistoricalSeries {
        HistoricalSeries::from_points(rows.iter().map(|&(y, m, d, p)| {
            HistoricalDataPoint::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), p)
        }))
    }

    fn forward_leg() -> Vec<StrategyComponent> {
        vec![StrategyComponent::forward(100.0, StrikeType::Percent, 100.0)]
    }

    fn config(months: u32) -> BacktestConfig {
        BacktestConfig {
            spot: Some(1.10),
            params: ForexParams::new(3.0, 1.0, months),
            coverage_ratio: 100.0,
            total_volume: 1_200.0,
            use_historical_volatility: false,
        }
    }

    #[test]
    fn test_forward_backtest() {
        let s = series(&[(2023, 1, 1, 1.10), (2023, 2, 1, 1.12), (2023, 3, 1, 1.08)]);
        let report = Backtester::run(&forward_leg(), &s, &config(0)).unwrap();

        assert_eq!(report.results.len(), 3);
        let feb = &report.results[1];
        assert_eq!(feb.date, "2023-02");
        assert_relative_eq!(feb.time_to_maturity, 2.0 / 12.0);
        assert_eq!(feb.monthly_volume, 400.0);
        assert_relative_eq!(feb.effective_rate, 1.10, epsilon = 1e-12);
        assert_relative_eq!(feb.hedged_revenue, 440.0, epsilon = 1e-9);
        assert_relative_eq!(feb.unhedged_revenue, 448.0, epsilon = 1e-9);
        assert_relative_eq!(feb.pnl_vs_unhedged, -8.0, epsilon = 1e-9);
        assert_relative_eq!(
            feb.forward_rate,
            1.10 * (0.02_f64 * 2.0 / 12.0).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_months_to_hedge_limits_periods() {
        let s = series(&[(2023, 1, 1, 1.10), (2023, 2, 1, 1.12), (2023, 3, 1, 1.08)]);
        let report = Backtester::run(&forward_leg(), &s, &config(2)).unwrap();
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].monthly_volume, 600.0);
        assert_eq!(report.monthly_stats.len(), 3);
    }

    #[test]
    fn test_spot_defaults_to_first_observation() {
        let s = series(&[(2023, 1, 1, 1.20), (2023, 2, 1, 1.25)]);
        let mut cfg = config(0);
        cfg.spot = None;
        let report = Backtester::run(&forward_leg(), &s, &cfg).unwrap();
        assert_relative_eq!(report.results[1].effective_rate, 1.20, epsilon = 1e-12);
    }

    #[test]
    fn test_yearly_summary_and_cost_reduction() {
        let s = series(&[(2022, 12, 1, 1.00), (2023, 1, 1, 1.10), (2023, 2, 1, 1.20)]);
        let report = Backtester::run(&forward_leg(), &s, &config(0)).unwrap();

        assert_eq!(report.yearly.len(), 2);
        let y2023 = &report.yearly[1];
        assert_eq!(y2023.year, 2023);
        assert_eq!(y2023.summary.months, 2);
        let jan = &report.results[1];
        let feb = &report.results[2];
        assert_eq!(y2023.summary.hedged_revenue, jan.hedged_revenue + feb.hedged_revenue);
        assert_eq!(y2023.summary.unhedged_revenue, jan.unhedged_revenue + feb.unhedged_revenue);

        let expected = (y2023.summary.unhedged_revenue - y2023.summary.hedged_revenue)
            / y2023.summary.unhedged_revenue
            * 100.0;
        assert_relative_eq!(y2023.summary.cost_reduction_percent, expected);
        assert_eq!(report.totals.months, 3);
    }

    #[test]
    fn test_historical_volatility_overrides_legs() {
        let s = series(&[
            (2023, 1, 2, 1.10),
            (2023, 1, 3, 1.12),
            (2023, 1, 4, 1.09),
            (2023, 2, 1, 1.11),
        ]);
        let put = vec![StrategyComponent::option(
            ComponentKind::Put,
            100.0,
            StrikeType::Percent,
            1.0,
            100.0,
        )];
        let mut cfg = config(0);
        let assumed = Backtester::run(&put, &s, &cfg).unwrap();
        cfg.use_historical_volatility = true;
        let realized = Backtester::run(&put, &s, &cfg).unwrap();

        let vol = realized.historical_volatility.unwrap();
        assert_relative_eq!(vol, s.annualized_volatility().unwrap());
        // Realized vol is far above the assumed 1%, so premiums rise.
        assert!(realized.results[0].premium_paid > assumed.results[0].premium_paid);
    }

    #[test]
    fn test_two_point_series_keeps_leg_volatility() {
        let s = series(&[(2023, 1, 2, 1.00), (2023, 2, 1, 1.50)]);
        let put = vec![StrategyComponent::option(
            ComponentKind::Put,
            100.0,
            StrikeType::Percent,
            10.0,
            100.0,
        )];
        let mut cfg = config(0);
        let assumed = Backtester::run(&put, &s, &cfg).unwrap();
        cfg.use_historical_volatility = true;
        let realized = Backtester::run(&put, &s, &cfg).unwrap();

        assert_eq!(realized.historical_volatility, None);
        assert_eq!(realized.results, assumed.results);
        assert!(realized.results[0].premium_paid > 0.0);
    }

    #[test]
    fn test_maturity_follows_calendar_gaps() {
        let s = series(&[(2023, 1, 1, 1.10), (2023, 2, 1, 1.12), (2023, 5, 1, 1.08)]);
        let report = Backtester::run(&forward_leg(), &s, &config(0)).unwrap();

        assert_eq!(report.results[2].date, "2023-05");
        assert_relative_eq!(report.results[2].time_to_maturity, 5.0 / 12.0);
        assert_relative_eq!(
            report.results[2].forward_rate,
            1.10 * (0.02_f64 * 5.0 / 12.0).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let empty = HistoricalSeries::new();
        assert!(matches!(
            Backtester::run(&forward_leg(), &empty, &config(0)),
            Err(HedgeError::Configuration(_))
        ));
        let s = series(&[(2023, 1, 1, 1.10)]);
        assert!(Backtester::run(&[], &s, &config(0)).is_err());
    }
}
