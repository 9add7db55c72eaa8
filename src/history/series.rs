//! Historical rate series and its text ingestion.

use crate::core::error::{HedgeError, HedgeResult};
use crate::core::rate_math::annualized_volatility;
use crate::history::stats::{monthly_stats, MonthlyStats};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One observed rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl HistoricalDataPoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Decimal separator used by the price column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// `1.10`
    #[default]
    Dot,
    /// `1,10`; normalized to a decimal point before parsing.
    Comma,
}

/// How the first line of an import is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Skip the first line only if its date field does not parse.
    #[default]
    Auto,
    Skip,
    None,
}

/// Options for [`parse_historical_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOptions {
    #[serde(default)]
    pub locale: NumberLocale,
    #[serde(default)]
    pub header: HeaderMode,
}

/// Date-ordered rate observations, at most one per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries {
    points: Vec<HistoricalDataPoint>,
}

impl HistoricalSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from unordered points; a later point wins on a shared date.
    pub fn from_points(points: impl IntoIterator<Item = HistoricalDataPoint>) -> Self {
        let mut series = Self::new();
        for point in points {
            series.upsert(point);
        }
        series
    }

    /// Insert a point, replacing any existing observation on the same date.
    ///
    /// Returns the replaced price, if any.
    pub fn upsert(&mut self, point: HistoricalDataPoint) -> Option<f64> {
        match self.points.binary_search_by(|p| p.date.cmp(&point.date)) {
            Ok(index) => {
                let previous = self.points[index].price;
                self.points[index] = point;
                Some(previous)
            }
            Err(index) => {
                self.points.insert(index, point);
                None
            }
        }
    }

    /// Remove the observation on `date`.
    pub fn remove(&mut self, date: &NaiveDate) -> Option<HistoricalDataPoint> {
        let index = self.points.binary_search_by(|p| p.date.cmp(date)).ok()?;
        Some(self.points.remove(index))
    }

    pub fn points(&self) -> &[HistoricalDataPoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first(&self) -> Option<&HistoricalDataPoint> {
        self.points.first()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average price and volatility per calendar month, chronological.
    pub fn monthly_stats(&self) -> Vec<MonthlyStats> {
        monthly_stats(&self.points)
    }

    /// Realized volatility over the whole series.
    pub fn annualized_volatility(&self) -> Option<f64> {
        annualized_volatility(&self.prices())
    }
}

/// Parse `YYYY-MM-DD,<price>` rows into a series.
///
/// Blank lines are ignored. Any malformed row fails the whole batch with its
/// 1-based line number; nothing is ingested in that case. Fields may also be
/// separated by `;` or a tab, which allows decimal-comma prices such as
/// `2023-01-02;1,0712`.
///
/// # Examples
///
/// ```
/// use fx_hedge_engine::history::series::{parse_historical_data, IngestOptions};
///
/// let series = parse_historical_data("date,price\n2023-01-02,1.07\n", &IngestOptions::default()).unwrap();
/// assert_eq!(series.len(), 1);
/// ```
pub fn parse_historical_data(input: &str, options: &IngestOptions) -> HedgeResult<HistoricalSeries> {
    let mut series = HistoricalSeries::new();
    let mut seen_first = false;

    for (index, raw) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let is_first = !seen_first;
        seen_first = true;
        if is_first && skip_as_header(line, options) {
            debug!("skipping header line: {}", line);
            continue;
        }

        let point = parse_row(line, line_number, options.locale)?;
        if let Some(previous) = series.upsert(point) {
            warn!(
                "line {}: duplicate date {} replaces price {} with {}",
                line_number, point.date, previous, point.price
            );
        }
    }

    debug!("ingested {} historical observations", series.len());
    Ok(series)
}

/// In `Auto` mode only a line with neither a date nor a numeric price is a
/// header; a numeric price under a bad date is a malformed row.
fn skip_as_header(line: &str, options: &IngestOptions) -> bool {
    match options.header {
        HeaderMode::Skip => true,
        HeaderMode::None => false,
        HeaderMode::Auto => {
            let (date, price) = split_fields(line).unwrap_or((line, ""));
            parse_date(date).is_none() && parse_number(price, options.locale).is_none()
        }
    }
}

fn parse_number(field: &str, locale: NumberLocale) -> Option<f64> {
    match locale {
        NumberLocale::Dot => field.parse().ok(),
        NumberLocale::Comma => field.replace(',', ".").parse().ok(),
    }
}

fn split_fields(line: &str) -> Option<(&str, &str)> {
    line.split_once([',', ';', '\t'])
        .map(|(date, price)| (date.trim(), price.trim()))
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    // chrono accepts single-digit months and days; the format is strictly padded.
    if field.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(field, DATE_FORMAT).ok()
}

fn parse_row(line: &str, line_number: usize, locale: NumberLocale) -> HedgeResult<HistoricalDataPoint> {
    let (date_field, price_field) = split_fields(line).ok_or_else(|| {
        HedgeError::validation(line_number, format!("expected 'YYYY-MM-DD,price', got '{}'", line))
    })?;

    let date = parse_date(date_field).ok_or_else(|| {
        HedgeError::validation(line_number, format!("invalid date '{}'", date_field))
    })?;

    let price = parse_number(price_field, locale).ok_or_else(|| {
        HedgeError::validation(line_number, format!("invalid price '{}'", price_field))
    })?;
    if !price.is_finite() || price <= 0.0 {
        return Err(HedgeError::validation(
            line_number,
            format!("price must be a positive number, got '{}'", price_field),
        ));
    }

    Ok(HistoricalDataPoint::new(date, price))
}
