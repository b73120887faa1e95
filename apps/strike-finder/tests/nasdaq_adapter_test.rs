//! Nasdaq adapter against a mock upstream.
//!
//! Payloads follow the shapes `api.nasdaq.com` returns: display strings for
//! numbers, expiry group headers interleaved with strike rows, and greeks on a
//! separate endpoint.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use strike_finder::application::ports::{MarketDataError, OptionChainPort};
use strike_finder::domain::options::OptionRight;
use strike_finder::infrastructure::nasdaq::{self, NasdaqAdapter};
use strike_finder::infrastructure::upstream::{DEFAULT_USER_AGENT, SNIPPET_CHARS, UpstreamHttpClient};

const CHAIN_PATH: &str = "/api/quote/nflx/option-chain";
const GREEKS_PATH: &str = "/api/quote/nflx/option-chain/greeks";

fn feb13() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
}

fn adapter(server: &MockServer) -> NasdaqAdapter {
    let client =
        UpstreamHttpClient::new(nasdaq::PROVIDER, Duration::from_secs(5), DEFAULT_USER_AGENT)
            .unwrap();
    NasdaqAdapter::new(client, server.uri())
}

fn chain_body() -> serde_json::Value {
    json!({
        "data": {
            "lastTrade": "LAST TRADE: $82.2 (AS OF FEB 6, 2026)",
            "table": {
                "rows": [
                    { "expirygroup": "February 13, 2026", "strike": null },
                    {
                        "expirygroup": "", "strike": "75.00",
                        "c_Bid": "8.10", "c_Ask": "8.30", "c_Last": "8.20",
                        "p_Bid": "0.70", "p_Ask": "0.80", "p_Last": "0.75",
                        "drillDownURL": "/market-activity/stocks/nflx/option-chain/call-put-options/nflx--260213p00075000"
                    },
                    {
                        "expirygroup": "", "strike": "80.00",
                        "c_Bid": "4.10", "c_Ask": "4.30", "c_Last": "4.25",
                        "p_Bid": "1.40", "p_Ask": "1.60", "p_Last": "1.52",
                        "drillDownURL": "/market-activity/stocks/nflx/option-chain/call-put-options/nflx--260213p00080000"
                    },
                    {
                        "expirygroup": "", "strike": "85.00",
                        "c_Bid": "1.20", "c_Ask": "1.35", "c_Last": "1.30",
                        "p_Bid": "--", "p_Ask": "--", "p_Last": "3.10"
                    },
                    { "expirygroup": "March 20, 2026", "strike": null },
                    {
                        "expirygroup": "", "strike": "80.00",
                        "p_Bid": "3.00", "p_Ask": "3.20"
                    }
                ]
            }
        },
        "message": null,
        "status": { "rCode": 200 }
    })
}

fn greeks_body() -> serde_json::Value {
    json!({
        "data": {
            "table": {
                "rows": [
                    { "strike": "75.00", "cDelta": 0.85, "pDelta": -0.15 },
                    { "strike": "80.00", "cDelta": 0.75, "pDelta": -0.25 },
                    { "strike": "85.00", "cDelta": 0.60, "pDelta": -0.40 }
                ]
            }
        },
        "message": null
    })
}

async fn mount_chain(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CHAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chain_body()))
        .mount(server)
        .await;
}

async fn mount_greeks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(GREEKS_PATH))
        .and(query_param("date", "2026-02-13"))
        .respond_with(ResponseTemplate::new(200).set_body_json(greeks_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn option_chain_joins_rows_with_greeks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHAIN_PATH))
        .and(query_param("assetclass", "stocks"))
        .and(query_param("fromdate", "2026-02-13"))
        .and(query_param("todate", "2026-02-13"))
        // Exact header matching splits on commas, and the agent has one
        .and(header_regex("user-agent", r"^Mozilla/5\.0 \(Macintosh.*\) Chrome/[\d.]+ Safari/[\d.]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chain_body()))
        .mount(&server)
        .await;
    mount_greeks(&server).await;

    let chain = adapter(&server)
        .option_chain("NFLX", feb13(), OptionRight::Put)
        .await
        .unwrap();

    // 85 has no two-sided put quote; the March row belongs to another group
    assert_eq!(chain.value.len(), 2);
    assert_eq!(chain.value[0].strike, dec!(75));
    assert_eq!(chain.value[0].delta, dec!(-0.15));
    assert_eq!(chain.value[1].strike, dec!(80));
    assert_eq!(chain.value[1].mid(), dec!(1.50));

    assert_eq!(chain.sources.len(), 2);
    assert!(chain.sources[0].contains("/api/quote/nflx/option-chain?"));
    assert!(chain.sources[0].contains("fromdate=2026-02-13"));
    assert!(chain.sources[1].contains("/option-chain/greeks?"));
    assert!(chain.sources[1].contains("date=2026-02-13"));
}

#[tokio::test]
async fn call_side_uses_call_columns() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_greeks(&server).await;

    let chain = adapter(&server)
        .option_chain("nflx", feb13(), OptionRight::Call)
        .await
        .unwrap();

    assert_eq!(chain.value.len(), 3);
    assert_eq!(chain.value[2].strike, dec!(85));
    assert_eq!(chain.value[2].delta, dec!(0.60));
    assert_eq!(chain.value[2].bid, dec!(1.20));
}

#[tokio::test]
async fn contract_premium_for_listed_strike() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_greeks(&server).await;

    let premium = adapter(&server)
        .contract_premium("nflx", feb13(), dec!(80), OptionRight::Put)
        .await
        .unwrap();

    assert_eq!(premium.ticker, "NFLX");
    assert_eq!(premium.bid, Some(dec!(1.40)));
    assert_eq!(premium.ask, Some(dec!(1.60)));
    assert_eq!(premium.last, Some(dec!(1.52)));
    assert_eq!(premium.mid, Some(dec!(1.50)));
    assert_eq!(premium.delta, Some(dec!(-0.25)));
    assert_eq!(
        premium.contract_symbol.as_deref(),
        Some("nflx--260213p00080000")
    );
    assert_eq!(premium.sources.len(), 2);
}

#[tokio::test]
async fn contract_premium_falls_back_to_last_without_two_sides() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    mount_greeks(&server).await;

    let premium = adapter(&server)
        .contract_premium("NFLX", feb13(), dec!(85), OptionRight::Put)
        .await
        .unwrap();

    assert_eq!(premium.bid, None);
    assert_eq!(premium.mid, Some(dec!(3.10)));
}

#[tokio::test]
async fn contract_premium_survives_greeks_failure() {
    let server = MockServer::start().await;
    mount_chain(&server).await;
    Mock::given(method("GET"))
        .and(path(GREEKS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let premium = adapter(&server)
        .contract_premium("NFLX", feb13(), dec!(80), OptionRight::Put)
        .await
        .unwrap();

    assert_eq!(premium.delta, None);
    assert_eq!(premium.mid, Some(dec!(1.50)));
    assert_eq!(premium.sources.len(), 1);
}

#[tokio::test]
async fn unlisted_strike_is_not_found_with_nearby_strikes() {
    let server = MockServer::start().await;
    mount_chain(&server).await;

    let err = adapter(&server)
        .contract_premium("NFLX", feb13(), dec!(81), OptionRight::Put)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.contains("strike 81"));
    assert!(message.contains("nearby strikes: 75.00, 80.00, 85.00"));
}

#[tokio::test]
async fn unlisted_expiry_is_not_found() {
    let server = MockServer::start().await;
    mount_chain(&server).await;

    let err = adapter(&server)
        .contract_premium(
            "NFLX",
            NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            dec!(80),
            OptionRight::Put,
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("2026-02-20"));
}

#[tokio::test]
async fn latest_price_from_last_trade_text() {
    let server = MockServer::start().await;
    mount_chain(&server).await;

    let latest = adapter(&server).latest_price("nflx").await.unwrap();

    assert_eq!(latest.ticker, "NFLX");
    assert_eq!(latest.price, dec!(82.2));
    assert!(latest.sources[0].contains("assetclass=stocks"));
}

#[tokio::test]
async fn latest_price_keeps_thousands() {
    let server = MockServer::start().await;
    let mut body = chain_body();
    body["data"]["lastTrade"] = json!("LAST TRADE: $1,234.56 (AS OF FEB 6, 2026)");
    Mock::given(method("GET"))
        .and(path(CHAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let latest = adapter(&server).latest_price("NFLX").await.unwrap();

    assert_eq!(latest.price, dec!(1234.56));
}

#[tokio::test]
async fn last_sale_price_from_quote_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quote/nflx/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "primaryData": { "lastSalePrice": "$82.20", "netChange": "-0.41" } },
            "message": null
        })))
        .mount(&server)
        .await;

    let last = adapter(&server).last_sale_price("NFLX").await.unwrap();
    assert_eq!(last.price, dec!(82.20));
}

#[tokio::test]
async fn expiries_are_sorted_group_headers() {
    let server = MockServer::start().await;
    mount_chain(&server).await;

    let expiries = adapter(&server).expiries("NFLX").await.unwrap();

    assert_eq!(
        expiries.value,
        vec![feb13(), NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()]
    );
}

#[tokio::test]
async fn error_status_carries_url_and_snippet() {
    let server = MockServer::start().await;
    let body = format!("<html>{}</html>", "Access Denied ".repeat(100));
    Mock::given(method("GET"))
        .and(path(CHAIN_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string(body))
        .mount(&server)
        .await;

    let err = adapter(&server).latest_price("NFLX").await.unwrap_err();

    match err {
        MarketDataError::Status {
            status,
            url,
            snippet,
        } => {
            assert_eq!(status, 403);
            assert!(url.contains(CHAIN_PATH));
            assert!(snippet.starts_with("<html>Access Denied"));
            assert_eq!(snippet.chars().count(), SNIPPET_CHARS);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html><p>captcha</p>"))
        .mount(&server)
        .await;

    let err = adapter(&server).latest_price("NFLX").await.unwrap_err();

    match err {
        MarketDataError::InvalidJson { snippet, .. } => {
            assert!(snippet.contains("captcha"));
        }
        other => panic!("expected invalid JSON, got {other:?}"),
    }
}

#[tokio::test]
async fn null_data_is_unexpected_payload_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quote/zzzz/option-chain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "message": "Symbol not exists",
            "status": { "rCode": 400 }
        })))
        .mount(&server)
        .await;

    let err = adapter(&server).expiries("ZZZZ").await.unwrap_err();

    assert!(matches!(err, MarketDataError::UnexpectedPayload { .. }));
    assert!(err.to_string().contains("Symbol not exists"));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client =
        UpstreamHttpClient::new(nasdaq::PROVIDER, Duration::from_secs(2), DEFAULT_USER_AGENT)
            .unwrap();
    // Nothing listens on the discard port
    let adapter = NasdaqAdapter::new(client, "http://127.0.0.1:9");

    let err = adapter.latest_price("NFLX").await.unwrap_err();

    assert!(matches!(err, MarketDataError::Network { .. }));
}
