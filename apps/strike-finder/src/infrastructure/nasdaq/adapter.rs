//! Nasdaq adapter implementing `OptionChainPort`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::ports::{
    ContractPremium, LatestPrice, MarketDataError, OptionChainPort, Sourced, mid_or_last,
};
use crate::domain::options::{OptionQuote, OptionRight};
use crate::infrastructure::upstream::UpstreamHttpClient;

use super::api_types::{
    ChainRow, GreeksData, GreeksRow, InfoData, NasdaqEnvelope, OptionChainData, parse_last_trade,
};

/// Provider label for logs and metrics.
pub const PROVIDER: &str = "nasdaq";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.nasdaq.com";

/// Strikes closer than this are the same strike.
const STRIKE_EPSILON: Decimal = dec!(0.000001);

/// Strikes listed in a not-found message.
const NEARBY_STRIKES: usize = 6;

/// Nasdaq option chain adapter.
///
/// Implements `OptionChainPort` over the unofficial `api.nasdaq.com` quote
/// endpoints.
#[derive(Debug, Clone)]
pub struct NasdaqAdapter {
    client: UpstreamHttpClient,
    base_url: String,
}

impl NasdaqAdapter {
    /// Create a new adapter.
    pub fn new(client: UpstreamHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn quote_url(&self, ticker: &str, path: &str) -> String {
        format!(
            "{}/api/quote/{}/{path}",
            self.base_url,
            ticker.to_ascii_lowercase()
        )
    }

    /// Fetch the option chain, optionally narrowed to one expiry.
    ///
    /// The endpoint returns only a near-dated window unless a date range is
    /// given.
    async fn fetch_chain(
        &self,
        ticker: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<(OptionChainData, String), MarketDataError> {
        let mut query = vec![("assetclass", "stocks".to_string())];
        if let Some(expiry) = expiry {
            let day = expiry.format("%Y-%m-%d").to_string();
            query.push(("fromdate", day.clone()));
            query.push(("todate", day));
        }

        let fetched = self
            .client
            .get_json::<NasdaqEnvelope<OptionChainData>>(
                &self.quote_url(ticker, "option-chain"),
                &query,
            )
            .await?;

        let message = fetched.body.message_text();
        match fetched.body.data {
            Some(data) if data.table.is_some() => Ok((data, fetched.url)),
            _ => Err(MarketDataError::UnexpectedPayload {
                url: fetched.url,
                message: format!("no option chain table for {ticker}: {message}"),
            }),
        }
    }

    async fn fetch_greeks(
        &self,
        ticker: &str,
        expiry: NaiveDate,
    ) -> Result<(Vec<GreeksRow>, String), MarketDataError> {
        let query = [
            ("assetclass", "stocks".to_string()),
            ("date", expiry.format("%Y-%m-%d").to_string()),
        ];

        let fetched = self
            .client
            .get_json::<NasdaqEnvelope<GreeksData>>(
                &self.quote_url(ticker, "option-chain/greeks"),
                &query,
            )
            .await?;

        let message = fetched.body.message_text();
        match fetched.body.data.and_then(|d| d.table) {
            Some(table) => Ok((table.rows.unwrap_or_default(), fetched.url)),
            None => Err(MarketDataError::UnexpectedPayload {
                url: fetched.url,
                message: format!("no greeks table for {ticker} {expiry}: {message}"),
            }),
        }
    }

    /// Chain rows and the chain URL for one expiry.
    async fn expiry_rows(
        &self,
        ticker: &str,
        expiry: NaiveDate,
    ) -> Result<(Vec<ChainRow>, String), MarketDataError> {
        let (data, url) = self.fetch_chain(ticker, Some(expiry)).await?;
        let rows = data.table.and_then(|t| t.rows).unwrap_or_default();
        Ok((rows_for_expiry(rows, expiry), url))
    }
}

#[async_trait]
impl OptionChainPort for NasdaqAdapter {
    async fn latest_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError> {
        let (data, url) = self.fetch_chain(ticker, None).await?;
        let last_trade = data.last_trade.unwrap_or_default();

        let price = parse_last_trade(&last_trade).ok_or_else(|| {
            MarketDataError::UnexpectedPayload {
                url: url.clone(),
                message: format!("could not parse lastTrade for {ticker}: {last_trade:?}"),
            }
        })?;

        Ok(LatestPrice {
            ticker: ticker.to_ascii_uppercase(),
            price,
            sources: vec![url],
        })
    }

    async fn last_sale_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError> {
        let fetched = self
            .client
            .get_json::<NasdaqEnvelope<InfoData>>(
                &self.quote_url(ticker, "info"),
                &[("assetclass", "stocks".to_string())],
            )
            .await?;

        let primary = fetched
            .body
            .data
            .and_then(|d| d.primary_data)
            .unwrap_or_default();

        let price = primary
            .last_sale_price
            .or(primary.last_trade)
            .ok_or_else(|| MarketDataError::UnexpectedPayload {
                url: fetched.url.clone(),
                message: format!("no lastSalePrice in quote info for {ticker}"),
            })?;

        Ok(LatestPrice {
            ticker: ticker.to_ascii_uppercase(),
            price,
            sources: vec![fetched.url],
        })
    }

    async fn expiries(&self, ticker: &str) -> Result<Sourced<Vec<NaiveDate>>, MarketDataError> {
        let (data, url) = self.fetch_chain(ticker, None).await?;
        let rows = data.table.and_then(|t| t.rows).unwrap_or_default();

        let mut expiries: Vec<NaiveDate> = rows
            .iter()
            .filter_map(ChainRow::group_header)
            .flatten()
            .collect();
        expiries.sort_unstable();
        expiries.dedup();

        if expiries.is_empty() {
            return Err(MarketDataError::UnexpectedPayload {
                url,
                message: format!("no expiry groups found for {ticker}"),
            });
        }

        tracing::debug!(ticker, count = expiries.len(), "Listed expiries");
        Ok(Sourced::single(expiries, url))
    }

    async fn option_chain(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        right: OptionRight,
    ) -> Result<Sourced<Vec<OptionQuote>>, MarketDataError> {
        let (rows, chain_url) = self.expiry_rows(ticker, expiry).await?;
        let (greeks, greeks_url) = self.fetch_greeks(ticker, expiry).await?;

        let deltas = delta_by_strike(&greeks, right);
        let quotes = join_quotes(&rows, &deltas, right);

        tracing::debug!(
            ticker,
            expiry = %expiry,
            right = %right,
            rows = rows.len(),
            greeks = greeks.len(),
            usable = quotes.len(),
            "Joined chain with greeks"
        );

        Ok(Sourced::new(quotes, vec![chain_url, greeks_url]))
    }

    async fn contract_premium(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: Decimal,
        right: OptionRight,
    ) -> Result<ContractPremium, MarketDataError> {
        let (rows, chain_url) = self.expiry_rows(ticker, expiry).await?;

        if rows.is_empty() {
            return Err(MarketDataError::NotFound {
                message: format!(
                    "no option rows for {} expiring {expiry}",
                    ticker.to_ascii_uppercase()
                ),
            });
        }

        let Some(row) = rows
            .iter()
            .find(|r| r.strike.is_some_and(|k| (k - strike).abs() <= STRIKE_EPSILON))
        else {
            let nearby = nearby_strikes(&rows, strike)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(MarketDataError::NotFound {
                message: format!(
                    "no {right} at strike {strike} for {} expiring {expiry}; nearby strikes: {nearby}",
                    ticker.to_ascii_uppercase()
                ),
            });
        };

        let (bid, ask, last) = sides(row, right);
        let mut sources = vec![chain_url];

        let delta = match self.fetch_greeks(ticker, expiry).await {
            Ok((greeks, greeks_url)) => {
                sources.push(greeks_url);
                delta_by_strike(&greeks, right)
                    .into_iter()
                    .find(|(k, _)| (*k - strike).abs() <= STRIKE_EPSILON)
                    .map(|(_, d)| d)
            }
            Err(err) => {
                tracing::warn!(ticker, expiry = %expiry, error = %err, "Greeks unavailable, omitting delta");
                None
            }
        };

        Ok(ContractPremium {
            ticker: ticker.to_ascii_uppercase(),
            expiry,
            strike,
            right,
            bid,
            ask,
            last,
            mid: mid_or_last(bid, ask, last),
            delta,
            contract_symbol: row.contract_symbol(),
            sources,
        })
    }
}

/// Rows belonging to `expiry`'s group, headers dropped.
fn rows_for_expiry(rows: Vec<ChainRow>, expiry: NaiveDate) -> Vec<ChainRow> {
    let mut current: Option<NaiveDate> = None;
    let mut selected = Vec::new();

    for row in rows {
        if let Some(group) = row.group_header() {
            current = group;
            continue;
        }
        if current == Some(expiry) && row.strike.is_some() {
            selected.push(row);
        }
    }

    selected
}

/// Bid, ask and last for one side of a chain row.
const fn sides(row: &ChainRow, right: OptionRight) -> (Option<Decimal>, Option<Decimal>, Option<Decimal>) {
    match right {
        OptionRight::Call => (row.c_bid, row.c_ask, row.c_last),
        OptionRight::Put => (row.p_bid, row.p_ask, row.p_last),
    }
}

fn delta_by_strike(greeks: &[GreeksRow], right: OptionRight) -> BTreeMap<Decimal, Decimal> {
    greeks
        .iter()
        .filter_map(|g| {
            let delta = match right {
                OptionRight::Call => g.c_delta,
                OptionRight::Put => g.p_delta,
            };
            Some((g.strike?, delta?))
        })
        .collect()
}

/// Quotes with delta, bid, ask and a positive mid, sorted by strike.
fn join_quotes(
    rows: &[ChainRow],
    deltas: &BTreeMap<Decimal, Decimal>,
    right: OptionRight,
) -> Vec<OptionQuote> {
    let mut quotes: Vec<OptionQuote> = rows
        .iter()
        .filter_map(|row| {
            let strike = row.strike?;
            let delta = *deltas.get(&strike)?;
            let (bid, ask, _) = sides(row, right);
            let quote = OptionQuote::new(strike, delta, bid?, ask?);
            (quote.mid() > Decimal::ZERO).then_some(quote)
        })
        .collect();

    quotes.sort_by(|a, b| a.strike.cmp(&b.strike));
    quotes
}

/// Listed strikes closest to `strike`, ascending.
fn nearby_strikes(rows: &[ChainRow], strike: Decimal) -> Vec<Decimal> {
    let mut strikes: Vec<Decimal> = rows.iter().filter_map(|r| r.strike).collect();
    strikes.sort_by_key(|k| (*k - strike).abs());
    strikes.truncate(NEARBY_STRIKES);
    strikes.sort();
    strikes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(group: &str) -> ChainRow {
        ChainRow {
            expirygroup: Some(group.to_string()),
            ..ChainRow::default()
        }
    }

    fn row(strike: Decimal, p_bid: Option<Decimal>, p_ask: Option<Decimal>) -> ChainRow {
        ChainRow {
            expirygroup: Some(String::new()),
            strike: Some(strike),
            p_bid,
            p_ask,
            ..ChainRow::default()
        }
    }

    fn feb13() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
    }

    #[test]
    fn rows_are_attributed_to_their_group() {
        let rows = vec![
            header("February 6, 2026"),
            row(dec!(70), Some(dec!(0.1)), Some(dec!(0.2))),
            header("February 13, 2026"),
            row(dec!(75), Some(dec!(0.7)), Some(dec!(0.8))),
            row(dec!(80), Some(dec!(1.4)), Some(dec!(1.6))),
            header("Not a date"),
            row(dec!(85), Some(dec!(3.0)), Some(dec!(3.2))),
        ];

        let selected = rows_for_expiry(rows, feb13());
        let strikes: Vec<_> = selected.iter().filter_map(|r| r.strike).collect();
        assert_eq!(strikes, vec![dec!(75), dec!(80)]);
    }

    #[test]
    fn join_drops_rows_missing_delta_or_sides() {
        let rows = vec![
            row(dec!(80), Some(dec!(1.4)), Some(dec!(1.6))),
            row(dec!(75), Some(dec!(0.7)), Some(dec!(0.8))),
            row(dec!(70), None, Some(dec!(0.3))),
            row(dec!(65), Some(dec!(0)), Some(dec!(0))),
            row(dec!(90), Some(dec!(9.0)), Some(dec!(9.5))),
        ];
        let deltas: BTreeMap<Decimal, Decimal> = [
            (dec!(65), dec!(-0.02)),
            (dec!(70), dec!(-0.08)),
            (dec!(75), dec!(-0.15)),
            (dec!(80.00), dec!(-0.25)),
        ]
        .into_iter()
        .collect();

        let quotes = join_quotes(&rows, &deltas, OptionRight::Put);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].strike, dec!(75));
        assert_eq!(quotes[1].strike, dec!(80));
        assert_eq!(quotes[1].delta, dec!(-0.25));
    }

    #[test]
    fn delta_map_uses_requested_side() {
        let greeks = vec![GreeksRow {
            strike: Some(dec!(80)),
            c_delta: Some(dec!(0.75)),
            p_delta: Some(dec!(-0.25)),
        }];
        assert_eq!(delta_by_strike(&greeks, OptionRight::Call)[&dec!(80)], dec!(0.75));
        assert_eq!(delta_by_strike(&greeks, OptionRight::Put)[&dec!(80)], dec!(-0.25));
    }

    #[test]
    fn nearby_strikes_are_closest_first_then_sorted() {
        let rows: Vec<ChainRow> = [60, 65, 70, 75, 80, 85, 90, 95, 100]
            .into_iter()
            .map(|k| row(Decimal::from(k), None, None))
            .collect();
        let nearby = nearby_strikes(&rows, dec!(81));
        assert_eq!(
            nearby,
            vec![dec!(70), dec!(75), dec!(80), dec!(85), dec!(90), dec!(95)]
        );
    }
}
