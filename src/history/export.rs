//! CSV export of backtest rows.

use crate::core::error::HedgeResult;
use crate::history::backtest::ForexResult;
use std::io::Write;

/// Column order of the export.
pub const CSV_HEADER: [&str; 11] = [
    "Date",
    "TimeToMaturity",
    "ForwardRate",
    "RealRate",
    "MonthlyVolume",
    "PremiumPaid",
    "PayoffFromHedge",
    "HedgedRevenue",
    "UnhedgedRevenue",
    "PnLVsUnhedged",
    "EffectiveRate",
];

/// Rates and times are written with 4 decimals, amounts with 2.
fn format_row(result: &ForexResult) -> [String; 11] {
    [
        result.date.clone(),
        format!("{:.4}", result.time_to_maturity),
        format!("{:.4}", result.forward_rate),
        format!("{:.4}", result.real_rate),
        format!("{:.2}", result.monthly_volume),
        format!("{:.2}", result.premium_paid),
        format!("{:.2}", result.payoff_from_hedge),
        format!("{:.2}", result.hedged_revenue),
        format!("{:.2}", result.unhedged_revenue),
        format!("{:.2}", result.pnl_vs_unhedged),
        format!("{:.4}", result.effective_rate),
    ]
}

/// Write `results` as CSV, header first.
pub fn write_results_csv<W: Write>(writer: W, results: &[ForexResult]) -> HedgeResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for result in results {
        csv.write_record(format_row(result))?;
    }
    csv.flush()?;
    Ok(())
}

/// Render `results` as a CSV string.
pub fn results_to_csv(results: &[ForexResult]) -> HedgeResult<String> {
    let mut buffer = Vec::new();
    write_results_csv(&mut buffer, results)?;
    // Every field is ASCII.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
