//! Options Desk Service
//!
//! Orchestrates the option chain and price history ports with the strike
//! interpolator for each user-facing operation. Holds no mutable state; every
//! call fetches fresh data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::dto::{
    CaseReport, CoveredCallReport, DeltaStrikeReport, PriceReport, StrikeSelection,
    UnderlyingPriceKind,
};
use crate::application::ports::{
    ClosePrice, ContractPremium, LatestPrice, OptionChainPort, PriceHistoryPort,
};
use crate::domain::options::{CoveredCall, OptionRight, StrikeInterpolator};
use crate::domain::shared::Ticker;
use crate::error::AppError;
use crate::observability::record_interpolation;

/// Default target delta for short puts.
pub const DEFAULT_PUT_DELTA: Decimal = dec!(-0.20);

/// Default target delta for covered calls.
pub const DEFAULT_CALL_DELTA: Decimal = dec!(0.20);

/// Default covered call size: one contract.
pub const DEFAULT_SHARES: u32 = 100;

/// Today's date in the local time zone, the default `asof`.
#[must_use]
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Inputs for [`OptionsDeskService::covered_call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredCallRequest {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Analysis date.
    pub asof: NaiveDate,
    /// Spot override; latest price when absent.
    pub spot: Option<Decimal>,
    /// Strike override; chosen by delta when absent.
    pub strike: Option<Decimal>,
    /// Target call delta, used when no strike is given.
    pub target_delta: Decimal,
    /// Shares covered.
    pub shares: u32,
}

/// Application service behind the CLI and HTTP API.
pub struct OptionsDeskService<C, H> {
    chain: C,
    history: H,
    interpolator: StrikeInterpolator,
}

impl<C, H> OptionsDeskService<C, H>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    /// Create a new service.
    pub const fn new(chain: C, history: H, interpolator: StrikeInterpolator) -> Self {
        Self {
            chain,
            history,
            interpolator,
        }
    }

    /// Latest traded price from the option chain page.
    pub async fn latest_price(&self, ticker: &str) -> Result<LatestPrice, AppError> {
        let ticker = Ticker::parse(ticker)?;
        Ok(self.chain.latest_price(ticker.as_str()).await?)
    }

    /// Close on `date`.
    pub async fn close_price(&self, ticker: &str, date: NaiveDate) -> Result<ClosePrice, AppError> {
        let ticker = Ticker::parse(ticker)?;
        Ok(self.history.close_on(ticker.as_str(), date).await?)
    }

    /// Close on `date` when given, otherwise the latest price.
    pub async fn price(&self, ticker: &str, date: Option<NaiveDate>) -> Result<PriceReport, AppError> {
        match date {
            Some(date) => Ok(PriceReport::Close(self.close_price(ticker, date).await?)),
            None => Ok(PriceReport::Latest(self.latest_price(ticker).await?)),
        }
    }

    /// Quote for one listed contract.
    pub async fn option_premium(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: Decimal,
        right: OptionRight,
    ) -> Result<ContractPremium, AppError> {
        let ticker = Ticker::parse(ticker)?;
        if strike <= Decimal::ZERO {
            return Err(AppError::input(format!("strike must be positive, got {strike}")));
        }
        Ok(self
            .chain
            .contract_premium(ticker.as_str(), expiry, strike, right)
            .await?)
    }

    /// Quote for one listed put.
    pub async fn put_premium(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: Decimal,
    ) -> Result<ContractPremium, AppError> {
        self.option_premium(ticker, expiry, strike, OptionRight::Put)
            .await
    }

    /// Strike and premium for `target_delta` on one expiry.
    pub async fn delta_strike(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        right: OptionRight,
        target_delta: Decimal,
    ) -> Result<DeltaStrikeReport, AppError> {
        let ticker = Ticker::parse(ticker)?;
        validate_target_delta(target_delta)?;

        let chain = self
            .chain
            .option_chain(ticker.as_str(), expiry, right)
            .await?;
        let quotes = chain.value;

        if quotes.is_empty() {
            tracing::warn!(
                ticker = %ticker,
                expiry = %expiry,
                right = %right,
                "No quotes with delta and two-sided prices"
            );
        }

        let result = self.interpolator.interpolate(&quotes, target_delta)?;
        record_interpolation(result.method.as_str());

        tracing::debug!(
            ticker = %ticker,
            expiry = %expiry,
            target_delta = %target_delta,
            strike = %result.strike,
            method = %result.method,
            quotes = quotes.len(),
            "Strike selected"
        );

        Ok(DeltaStrikeReport {
            ticker: ticker.to_string(),
            expiry,
            right,
            target_delta,
            strike: result.strike,
            achieved_delta: result.achieved_delta,
            premium: result.premium,
            method: result.method,
            quotes_considered: quotes.len(),
            sources: chain.sources,
        })
    }

    /// As [`Self::delta_strike`], defaulting the expiry to the nearest listed
    /// expiry on or after `asof`.
    pub async fn strike_premium(
        &self,
        ticker: &str,
        right: OptionRight,
        target_delta: Decimal,
        expiry: Option<NaiveDate>,
        asof: NaiveDate,
    ) -> Result<DeltaStrikeReport, AppError> {
        let (expiry, mut sources) = match expiry {
            Some(expiry) => (expiry, Vec::new()),
            None => {
                let ticker = Ticker::parse(ticker)?;
                let expiries = self.chain.expiries(ticker.as_str()).await?;
                let expiry = nearest_expiry(&expiries.value, asof).ok_or_else(|| {
                    AppError::upstream(format!("no option expiries listed for {ticker}"))
                })?;
                (expiry, expiries.sources)
            }
        };

        let mut report = self
            .delta_strike(ticker, expiry, right, target_delta)
            .await?;
        sources.append(&mut report.sources);
        report.sources = dedup_sources(sources);
        Ok(report)
    }

    /// Covered call analysis.
    pub async fn covered_call(
        &self,
        request: CoveredCallRequest,
    ) -> Result<CoveredCallReport, AppError> {
        let ticker = Ticker::parse(&request.ticker)?;
        if request.expiry <= request.asof {
            return Err(AppError::input(format!(
                "expiry {} must be after asof {}",
                request.expiry, request.asof
            )));
        }
        if let Some(strike) = request.strike.filter(|s| *s <= Decimal::ZERO) {
            return Err(AppError::input(format!("strike must be positive, got {strike}")));
        }

        CoveredCall::validate_shares(request.shares)?;

        let mut sources = Vec::new();

        let spot = match request.spot {
            Some(spot) => spot,
            None => {
                let latest = self.chain.latest_price(ticker.as_str()).await?;
                sources.extend(latest.sources);
                latest.price
            }
        };

        let (strike, selection, delta, premium, bid, ask) = match request.strike {
            Some(strike) => {
                let contract = self
                    .chain
                    .contract_premium(ticker.as_str(), request.expiry, strike, OptionRight::Call)
                    .await?;
                let premium = contract.premium().ok_or_else(|| {
                    AppError::upstream(format!(
                        "no usable premium (mid or bid) for {ticker} {} {strike} call",
                        request.expiry
                    ))
                })?;
                sources.extend(contract.sources);
                (
                    strike,
                    StrikeSelection::Given,
                    contract.delta,
                    premium,
                    contract.bid,
                    contract.ask,
                )
            }
            None => {
                let report = self
                    .delta_strike(
                        ticker.as_str(),
                        request.expiry,
                        OptionRight::Call,
                        request.target_delta,
                    )
                    .await?;
                sources.extend(report.sources);
                (
                    report.strike,
                    StrikeSelection::Delta(report.method),
                    Some(report.achieved_delta),
                    report.premium,
                    None,
                    None,
                )
            }
        };

        let days_to_expiry = (request.expiry - request.asof).num_days();
        let outcome = CoveredCall {
            spot,
            strike,
            premium,
            shares: request.shares,
            days_to_expiry,
        }
        .outcome()?;

        tracing::info!(
            ticker = %ticker,
            expiry = %request.expiry,
            strike = %strike,
            premium = %premium,
            "Covered call analyzed"
        );

        Ok(CoveredCallReport {
            ticker: ticker.to_string(),
            asof: request.asof,
            expiry: request.expiry,
            days_to_expiry,
            spot,
            right: OptionRight::Call,
            shares: request.shares,
            strike,
            strike_selection: selection,
            target_delta: request.target_delta,
            delta,
            premium,
            premium_bid: bid,
            premium_ask: ask,
            outcome,
            sources: dedup_sources(sources),
        })
    }

    /// Close on `date` plus the put quote at `strike`.
    ///
    /// If the close lookup fails the last sale is used instead and the report
    /// carries a warning.
    pub async fn case_report(
        &self,
        ticker: &str,
        date: NaiveDate,
        expiry: NaiveDate,
        strike: Decimal,
    ) -> Result<CaseReport, AppError> {
        let ticker = Ticker::parse(ticker)?;
        let mut sources = Vec::new();

        let (underlying_price, underlying_kind, underlying_warning) =
            match self.history.close_on(ticker.as_str(), date).await {
                Ok(close) => {
                    sources.extend(close.sources);
                    (close.close, UnderlyingPriceKind::Close, None)
                }
                Err(err) => {
                    tracing::warn!(
                        ticker = %ticker,
                        date = %date,
                        error = %err,
                        "Close unavailable, falling back to last sale"
                    );
                    let last = self.chain.last_sale_price(ticker.as_str()).await?;
                    sources.extend(last.sources);
                    (
                        last.price,
                        UnderlyingPriceKind::LastSale,
                        Some(format!("close unavailable ({err}); using last sale")),
                    )
                }
            };

        let put = self.put_premium(ticker.as_str(), expiry, strike).await?;
        sources.extend(put.sources.iter().cloned());

        Ok(CaseReport {
            ticker: ticker.to_string(),
            date,
            underlying_price,
            underlying_kind,
            underlying_warning,
            put,
            sources: dedup_sources(sources),
        })
    }
}

fn validate_target_delta(target_delta: Decimal) -> Result<(), AppError> {
    if target_delta < Decimal::NEGATIVE_ONE || target_delta > Decimal::ONE {
        return Err(AppError::input(format!(
            "target_delta must be within [-1, 1], got {target_delta}"
        )));
    }
    Ok(())
}

/// Nearest expiry on or after `asof`, else the last listed one.
fn nearest_expiry(expiries: &[NaiveDate], asof: NaiveDate) -> Option<NaiveDate> {
    expiries
        .iter()
        .copied()
        .filter(|e| *e >= asof)
        .min()
        .or_else(|| expiries.iter().copied().max())
}

fn dedup_sources(sources: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(sources.len());
    for source in sources {
        if !seen.contains(&source) {
            seen.push(source);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MarketDataError, Sourced};
    use crate::domain::options::{InterpolationMethod, OptionQuote};
    use async_trait::async_trait;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct MockChain {
        quotes: Vec<OptionQuote>,
    }

    impl MockChain {
        fn with_puts() -> Self {
            Self {
                quotes: vec![
                    OptionQuote::new(dec!(75), dec!(-0.15), dec!(0.70), dec!(0.80)),
                    OptionQuote::new(dec!(80), dec!(-0.25), dec!(1.40), dec!(1.60)),
                ],
            }
        }

        fn empty() -> Self {
            Self { quotes: Vec::new() }
        }
    }

    #[async_trait]
    impl OptionChainPort for MockChain {
        async fn latest_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError> {
            Ok(LatestPrice {
                ticker: ticker.to_string(),
                price: dec!(100),
                sources: vec!["chain".to_string()],
            })
        }

        async fn last_sale_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError> {
            Ok(LatestPrice {
                ticker: ticker.to_string(),
                price: dec!(99.5),
                sources: vec!["info".to_string()],
            })
        }

        async fn expiries(&self, _ticker: &str) -> Result<Sourced<Vec<NaiveDate>>, MarketDataError> {
            Ok(Sourced::single(
                vec![d(2026, 2, 13), d(2026, 3, 20)],
                "expiries",
            ))
        }

        async fn option_chain(
            &self,
            _ticker: &str,
            _expiry: NaiveDate,
            _right: OptionRight,
        ) -> Result<Sourced<Vec<OptionQuote>>, MarketDataError> {
            Ok(Sourced::new(
                self.quotes.clone(),
                vec!["chain?date".to_string(), "greeks".to_string()],
            ))
        }

        async fn contract_premium(
            &self,
            ticker: &str,
            expiry: NaiveDate,
            strike: Decimal,
            right: OptionRight,
        ) -> Result<ContractPremium, MarketDataError> {
            if strike != dec!(80) {
                return Err(MarketDataError::NotFound {
                    message: format!("no {right} at strike {strike}"),
                });
            }
            Ok(ContractPremium {
                ticker: ticker.to_string(),
                expiry,
                strike,
                right,
                bid: Some(dec!(1.40)),
                ask: Some(dec!(1.60)),
                last: None,
                mid: Some(dec!(1.50)),
                delta: Some(dec!(-0.25)),
                contract_symbol: None,
                sources: vec!["chain?date".to_string(), "greeks".to_string()],
            })
        }
    }

    struct MockHistory {
        close: Option<Decimal>,
    }

    #[async_trait]
    impl PriceHistoryPort for MockHistory {
        async fn close_on(&self, ticker: &str, date: NaiveDate) -> Result<ClosePrice, MarketDataError> {
            match self.close {
                Some(close) => Ok(ClosePrice {
                    ticker: ticker.to_string(),
                    trading_date: date,
                    close,
                    currency: Some("USD".to_string()),
                    exchange: None,
                    sources: vec!["chart".to_string()],
                }),
                None => Err(MarketDataError::Status {
                    status: 429,
                    url: "chart".to_string(),
                    snippet: "Too Many Requests".to_string(),
                }),
            }
        }
    }

    fn desk(chain: MockChain, close: Option<Decimal>) -> OptionsDeskService<MockChain, MockHistory> {
        OptionsDeskService::new(chain, MockHistory { close }, StrikeInterpolator::default())
    }

    fn call_request(strike: Option<Decimal>, shares: u32) -> CoveredCallRequest {
        CoveredCallRequest {
            ticker: "nflx".to_string(),
            expiry: d(2026, 2, 13),
            asof: d(2026, 1, 14),
            spot: Some(dec!(78)),
            strike,
            target_delta: DEFAULT_CALL_DELTA,
            shares,
        }
    }

    #[tokio::test]
    async fn price_without_date_is_latest() {
        let report = desk(MockChain::with_puts(), Some(dec!(87.5)))
            .price("NFLX", None)
            .await
            .unwrap();
        assert!(matches!(report, PriceReport::Latest(_)));
        assert_eq!(report.price(), dec!(100));
    }

    #[tokio::test]
    async fn invalid_ticker_is_input_error() {
        let err = desk(MockChain::with_puts(), None)
            .latest_price("   ")
            .await
            .unwrap_err();
        assert!(err.is_input());
    }

    #[tokio::test]
    async fn non_positive_strike_is_rejected() {
        let err = desk(MockChain::with_puts(), None)
            .put_premium("NFLX", d(2026, 2, 13), Decimal::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_input());
        assert!(err.message().contains("strike must be positive"));
    }

    #[tokio::test]
    async fn delta_strike_interpolates() {
        let report = desk(MockChain::with_puts(), None)
            .delta_strike("nflx", d(2026, 2, 13), OptionRight::Put, DEFAULT_PUT_DELTA)
            .await
            .unwrap();
        assert_eq!(report.ticker, "NFLX");
        assert_eq!(report.strike, dec!(77.5));
        assert_eq!(report.premium, dec!(1.125));
        assert_eq!(report.method, InterpolationMethod::Interpolated);
        assert_eq!(report.quotes_considered, 2);
    }

    #[tokio::test]
    async fn empty_chain_is_input_error() {
        let err = desk(MockChain::empty(), None)
            .delta_strike("NFLX", d(2026, 2, 13), OptionRight::Put, DEFAULT_PUT_DELTA)
            .await
            .unwrap_err();
        assert!(err.is_input());
    }

    #[tokio::test]
    async fn target_delta_out_of_range_is_rejected() {
        let err = desk(MockChain::with_puts(), None)
            .delta_strike("NFLX", d(2026, 2, 13), OptionRight::Put, dec!(-1.2))
            .await
            .unwrap_err();
        assert!(err.message().contains("target_delta"));
    }

    #[tokio::test]
    async fn strike_premium_lists_expiry_source_first() {
        let report = desk(MockChain::with_puts(), None)
            .strike_premium("NFLX", OptionRight::Put, DEFAULT_PUT_DELTA, None, d(2026, 2, 14))
            .await
            .unwrap();
        assert_eq!(report.expiry, d(2026, 3, 20));
        assert_eq!(report.sources, vec!["expiries", "chain?date", "greeks"]);
    }

    #[tokio::test]
    async fn covered_call_with_given_strike_uses_contract_quote() {
        let report = desk(MockChain::with_puts(), None)
            .covered_call(call_request(Some(dec!(80)), 200))
            .await
            .unwrap();

        assert_eq!(report.strike_selection, StrikeSelection::Given);
        assert_eq!(report.spot, dec!(78));
        assert_eq!(report.premium, dec!(1.50));
        assert_eq!(report.premium_bid, Some(dec!(1.40)));
        assert_eq!(report.premium_ask, Some(dec!(1.60)));
        assert_eq!(report.days_to_expiry, 30);
        assert_eq!(report.outcome.breakeven, dec!(76.50));
        assert_eq!(report.outcome.premium_total, dec!(300));
        // Spot was given, so no latest price lookup
        assert_eq!(report.sources, vec!["chain?date", "greeks"]);
    }

    #[tokio::test]
    async fn covered_call_requires_expiry_after_asof() {
        let mut request = call_request(None, 100);
        request.asof = request.expiry;
        let err = desk(MockChain::with_puts(), None)
            .covered_call(request)
            .await
            .unwrap_err();
        assert!(err.message().contains("must be after asof"));
    }

    #[tokio::test]
    async fn covered_call_rejects_odd_lot() {
        let err = desk(MockChain::with_puts(), None)
            .covered_call(call_request(None, 150))
            .await
            .unwrap_err();
        assert!(err.is_input());
        assert!(err.message().contains("multiple of 100"));
    }

    #[tokio::test]
    async fn case_report_uses_close() {
        let report = desk(MockChain::with_puts(), Some(dec!(87.5)))
            .case_report("nflx", d(2026, 1, 5), d(2026, 2, 13), dec!(80))
            .await
            .unwrap();

        assert_eq!(report.ticker, "NFLX");
        assert_eq!(report.underlying_price, dec!(87.5));
        assert_eq!(report.underlying_kind, UnderlyingPriceKind::Close);
        assert!(report.underlying_warning.is_none());
        assert_eq!(report.put.mid, Some(dec!(1.50)));
        assert_eq!(report.sources, vec!["chart", "chain?date", "greeks"]);
    }

    #[tokio::test]
    async fn case_report_falls_back_to_last_sale() {
        let report = desk(MockChain::with_puts(), None)
            .case_report("NFLX", d(2026, 1, 5), d(2026, 2, 13), dec!(80))
            .await
            .unwrap();

        assert_eq!(report.underlying_price, dec!(99.5));
        assert_eq!(report.underlying_kind, UnderlyingPriceKind::LastSale);
        let warning = report.underlying_warning.unwrap();
        assert!(warning.contains("HTTP 429"));
        assert!(warning.contains("using last sale"));
        assert_eq!(report.sources[0], "info");
    }

    #[tokio::test]
    async fn case_report_unlisted_put_is_input_error() {
        let err = desk(MockChain::with_puts(), Some(dec!(87.5)))
            .case_report("NFLX", d(2026, 1, 5), d(2026, 2, 13), dec!(81))
            .await
            .unwrap_err();
        assert!(err.is_input());
    }

    #[test]
    fn nearest_expiry_on_or_after_asof() {
        let expiries = [d(2026, 1, 16), d(2026, 2, 13), d(2026, 3, 20)];
        assert_eq!(nearest_expiry(&expiries, d(2026, 1, 17)), Some(d(2026, 2, 13)));
        assert_eq!(nearest_expiry(&expiries, d(2026, 2, 13)), Some(d(2026, 2, 13)));
    }

    #[test]
    fn nearest_expiry_falls_back_to_last() {
        let expiries = [d(2026, 1, 16), d(2026, 2, 13)];
        assert_eq!(nearest_expiry(&expiries, d(2027, 1, 1)), Some(d(2026, 2, 13)));
        assert_eq!(nearest_expiry(&[], d(2027, 1, 1)), None);
    }

    #[test]
    fn target_delta_bounds() {
        assert!(validate_target_delta(dec!(-0.2)).is_ok());
        assert!(validate_target_delta(dec!(1)).is_ok());
        assert!(validate_target_delta(dec!(-1.5)).is_err());
    }

    #[test]
    fn sources_keep_first_occurrence_order() {
        let sources = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_sources(sources), vec!["b".to_string(), "a".to_string()]);
    }
}
