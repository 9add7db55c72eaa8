//! Risk matrix for a set of EUR/USD hedging strategies.
//!
//! Compares a forward, a collar and a knock-out put across
//! five probability-weighted price scenarios.

use fx_hedge_engine::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  fx-hedge-engine: Collar Risk Matrix Example ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let spot = 1.0850;
    let params = ForexParams::new(4.25, 3.50, 6);

    let collar = vec![
        StrategyComponent::option(ComponentKind::Put, 97.0, StrikeType::Percent, 8.5, 100.0),
        StrategyComponent::option(ComponentKind::Call, 104.0, StrikeType::Percent, 8.5, 100.0),
    ];
    let knock_out_put = vec![StrategyComponent::option(
        ComponentKind::PutKnockOut,
        100.0,
        StrikeType::Percent,
        8.5,
        100.0,
    )
    .with_lower_barrier(92.0, StrikeType::Percent)];

    let request = RiskMatrixRequest {
        spot,
        params,
        strategies: vec![
            MatrixStrategy::new(
                "Forward",
                100.0,
                vec![StrategyComponent::forward(100.0, StrikeType::Percent, 100.0)],
            ),
            MatrixStrategy::from_components("Collar 97/104", 100.0, &collar),
            MatrixStrategy::from_components("Collar 97/104 (70%)", 70.0, &collar),
            MatrixStrategy::new("Put KO 92%", 100.0, knock_out_put),
        ],
        ranges: vec![
            PriceRange::new(0.98, 1.03, 10.0),
            PriceRange::new(1.03, 1.07, 20.0),
            PriceRange::new(1.07, 1.11, 40.0),
            PriceRange::new(1.11, 1.15, 20.0),
            PriceRange::new(1.15, 1.20, 10.0),
        ],
    };

    let rows = match generate_risk_matrix(&request) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Risk matrix rejected: {}", e);
            return;
        }
    };

    print!("{:<22} {:>9} {:>10}", "Strategy", "Premium", "Exp. P&L");
    for range in &request.ranges {
        print!(" {:>11}", range.key());
    }
    println!();

    for row in &rows {
        print!(
            "{:<22} {:>9.4} {:>10.4}",
            row.name, row.costs.total_premium, row.hedging_cost
        );
        for rate in row.effective_rates() {
            print!(" {:>11.4}", rate);
        }
        println!();
    }

    println!("\n━━━ Rejected run: probabilities sum to 90% ━━━\n");
    let mut broken = request.clone();
    broken.ranges.pop();
    match generate_risk_matrix(&broken) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("{}", e),
    }
}
