use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fx_hedge_engine::core::component::{
    ComponentKind, MatrixStrategy, OptionKind, StrategyComponent, StrikeType,
};
use fx_hedge_engine::core::market::{ForexParams, PriceRange};
use fx_hedge_engine::hedging::risk_matrix::{RiskMatrixGenerator, RiskMatrixRequest};
use fx_hedge_engine::history::backtest::{BacktestConfig, Backtester};
use fx_hedge_engine::pricing::option_pricer::{OptionPricer, VanillaInputs};
use fx_hedge_engine::simulation::synthetic::{generate_rate_series, MarketSeriesConfig};

fn collar() -> Vec<StrategyComponent> {
    vec![
        StrategyComponent::option(ComponentKind::Put, 97.0, StrikeType::Percent, 9.0, 100.0),
        StrategyComponent::option(ComponentKind::Call, 105.0, StrikeType::Percent, 9.0, 100.0),
    ]
}

fn bench_vanilla_price(c: &mut Criterion) {
    let inputs = VanillaInputs {
        spot: 1.10,
        strike: 1.12,
        domestic_rate: 0.04,
        foreign_rate: 0.02,
        maturity: 0.5,
        volatility: 0.09,
    };

    c.bench_function("garman_kohlhagen_call", |b| {
        b.iter(|| OptionPricer::price(OptionKind::Call, black_box(&inputs)))
    });
}

fn bench_risk_matrix_20x20(c: &mut Criterion) {
    let strategies = (0..20)
        .map(|i| MatrixStrategy::new(format!("Collar {}", i), 50.0 + i as f64 * 2.5, collar()))
        .collect();
    let ranges = (0..20)
        .map(|i| PriceRange::new(0.90 + i as f64 * 0.02, 0.92 + i as f64 * 0.02, 5.0))
        .collect();
    let request = RiskMatrixRequest {
        spot: 1.10,
        params: ForexParams::new(4.0, 2.0, 12),
        strategies,
        ranges,
    };

    c.bench_function("risk_matrix_20x20", |b| {
        b.iter(|| RiskMatrixGenerator::generate(black_box(&request)))
    });
}

fn bench_backtest_five_years(c: &mut Criterion) {
    let series = generate_rate_series(&MarketSeriesConfig {
        observations: 1_300,
        seed: Some(11),
        ..Default::default()
    });
    let config = BacktestConfig {
        params: ForexParams::new(4.0, 2.0, 0),
        use_historical_volatility: true,
        ..Default::default()
    };

    c.bench_function("backtest_five_years", |b| {
        b.iter(|| Backtester::run(black_box(&collar()), black_box(&series), black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_vanilla_price,
    bench_risk_matrix_20x20,
    bench_backtest_five_years
);
criterion_main!(benches);
