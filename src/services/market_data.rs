use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{InstrumentMatch, PricePoint, PriceSeries, PriceSource};
use crate::services::fallback::synthesize_fallback_series;
use chrono::{Datelike, NaiveDate};
use std::time::Duration;
use time::{Date, Month, OffsetDateTime, Time};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use yahoo_finance_api as yahoo;

/// Delay between API requests to avoid rate limiting
const API_DELAY_MS: u64 = 500;

/// Minimum length for an instrument search query
const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Fetch historical closing prices for a symbol within a date range.
/// The result is a normalized, market-tagged series; it may be empty
/// for symbols with no quotes in the range.
pub async fn fetch_price_history(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<PriceSeries> {
    debug!(symbol = %symbol, start = %start, end = %end, "Fetching price history");

    let provider = yahoo::YahooConnector::new()
        .map_err(|e| AppError::Provider(format!("Failed to create Yahoo connector: {}", e)))?;

    let start_utc = OffsetDateTime::new_utc(to_time_date(start)?, Time::MIDNIGHT);
    let end_utc = OffsetDateTime::new_utc(to_time_date(end)?, Time::from_hms(23, 59, 59).unwrap());

    let response = provider
        .get_quote_history(symbol, start_utc, end_utc)
        .await
        .map_err(|e| AppError::Provider(format!("Yahoo Finance API error: {}", e)))?;

    let quotes = response
        .quotes()
        .map_err(|e| AppError::Provider(format!("Failed to parse quotes: {}", e)))?;

    let points: Vec<PricePoint> = quotes
        .iter()
        .filter_map(|quote| {
            let datetime = OffsetDateTime::from_unix_timestamp(quote.timestamp as i64).ok()?;
            let date = NaiveDate::from_ymd_opt(
                datetime.year(),
                datetime.month() as u32,
                datetime.day() as u32,
            )?;
            Some(PricePoint {
                date,
                nav: quote.close,
            })
        })
        .collect();

    info!(symbol = %symbol, point_count = points.len(), "Fetched price history");
    Ok(PriceSeries::new(points, PriceSource::Market))
}

/// Fetch the most recent NAV for a symbol. None when the symbol exists
/// but has no recent quote.
pub async fn fetch_latest_nav(symbol: &str) -> AppResult<Option<PricePoint>> {
    debug!(symbol = %symbol, "Fetching latest quote");

    let provider = yahoo::YahooConnector::new()
        .map_err(|e| AppError::Provider(format!("Failed to create Yahoo connector: {}", e)))?;

    let response = provider
        .get_latest_quotes(symbol, "1d")
        .await
        .map_err(|e| {
            warn!(symbol = %symbol, error = %e, "Failed to fetch latest quote");
            AppError::Provider(format!("Yahoo Finance API error: {}", e))
        })?;

    let quote = match response.last_quote() {
        Ok(q) => q,
        Err(_) => return Ok(None),
    };

    let datetime = OffsetDateTime::from_unix_timestamp(quote.timestamp as i64)
        .map_err(|_| AppError::Provider("Invalid timestamp".into()))?;
    let date = NaiveDate::from_ymd_opt(
        datetime.year(),
        datetime.month() as u32,
        datetime.day() as u32,
    )
    .ok_or_else(|| AppError::Provider("Invalid quote date".into()))?;

    Ok(Some(PricePoint {
        date,
        nav: quote.close,
    }))
}

/// Search for instruments matching a free-text query. Requires at least
/// two characters; shorter queries are rejected before any network
/// access.
pub async fn search_instruments(query: &str) -> AppResult<Vec<InstrumentMatch>> {
    let query = query.trim();
    if query.len() < MIN_SEARCH_QUERY_LEN {
        return Err(AppError::Validation(format!(
            "Search query must be at least {} characters",
            MIN_SEARCH_QUERY_LEN
        )));
    }

    debug!(query = %query, "Searching instruments");

    let provider = yahoo::YahooConnector::new()
        .map_err(|e| AppError::Provider(format!("Failed to create Yahoo connector: {}", e)))?;

    let response = provider
        .search_ticker_opt(query)
        .await
        .map_err(|e| AppError::Provider(format!("Yahoo Finance API error: {}", e)))?;

    let matches: Vec<InstrumentMatch> = response
        .quotes
        .into_iter()
        .map(|q| InstrumentMatch {
            name: q
                .long_name
                .or(q.short_name)
                .unwrap_or_else(|| q.symbol.clone()),
            symbol: q.symbol,
            instrument_type: q.quote_type,
            region: q.exchange,
        })
        .collect();

    debug!(query = %query, match_count = matches.len(), "Instrument search complete");
    Ok(matches)
}

/// Load a price series for valuation: real market data when available,
/// otherwise the synthetic fallback so a valuation can still be
/// produced. The provenance tag on the returned series records which
/// path was taken.
pub async fn load_price_series(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    config: &Config,
) -> PriceSeries {
    match fetch_price_history(symbol, start, end).await {
        Ok(series) if !series.is_empty() => series,
        Ok(_) => {
            warn!(symbol = %symbol, "Provider returned no data, synthesizing fallback series");
            synthesize_fallback_series(start, end, config, &mut rand::thread_rng())
        }
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Provider failed, synthesizing fallback series");
            synthesize_fallback_series(start, end, config, &mut rand::thread_rng())
        }
    }
}

/// Fetch price histories for multiple symbols with rate limiting, e.g.
/// a plan's instrument and its benchmark in one pass.
pub async fn fetch_price_histories(
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(String, AppResult<PriceSeries>)> {
    info!(symbol_count = symbols.len(), "Fetching price histories");
    let mut results = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        // Delay between requests (except for the first one)
        if i > 0 {
            sleep(Duration::from_millis(API_DELAY_MS)).await;
        }

        let result = fetch_price_history(symbol, start, end).await;
        results.push((symbol.to_string(), result));
    }

    results
}

/// Convert a chrono date to the `time` date the Yahoo client expects.
fn to_time_date(date: NaiveDate) -> AppResult<Date> {
    let month = Month::try_from(date.month() as u8)
        .map_err(|_| AppError::Validation(format!("Invalid month in date: {}", date)))?;
    Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| AppError::Validation(format!("Invalid date: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_search_query_is_rejected() {
        let result = search_instruments("a").await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = search_instruments(" b ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
