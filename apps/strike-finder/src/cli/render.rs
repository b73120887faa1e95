//! Plain-text rendering for terminal output.
//!
//! Every renderer ends with one `source:` line per upstream URL.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::dto::{CaseReport, DeltaStrikeReport, PriceReport, UnderlyingPriceKind};

/// Pretty JSON, as printed for `--json` and the JSON-by-default commands.
pub fn json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// `price` output.
pub fn price(report: &PriceReport) -> String {
    let mut out = String::new();
    match report {
        PriceReport::Close(close) => {
            let _ = writeln!(out, "Ticker symbol {}", close.ticker);
            let _ = writeln!(
                out,
                "closing price for {} = {:.2}",
                close.trading_date, close.close
            );
        }
        PriceReport::Latest(latest) => {
            let _ = writeln!(out, "Ticker symbol {}", latest.ticker);
            let _ = writeln!(out, "latest price = {:.2}", latest.price);
        }
    }
    push_sources(&mut out, report.sources());
    out
}

/// `delta-strike` and `strike-premium` output.
pub fn delta_strike(report: &DeltaStrikeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ticker symbol {}", report.ticker);
    let _ = writeln!(
        out,
        "expiry {} right {} target delta {:.2}",
        report.expiry, report.right, report.target_delta
    );
    let _ = writeln!(
        out,
        "strike ~ {:.2} premium(mid) ~ {:.2} (delta {:.3}, {})",
        report.strike, report.premium, report.achieved_delta, report.method
    );
    push_sources(&mut out, &report.sources);
    out
}

/// `case` output.
pub fn case(report: &CaseReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ticker symbol {}", report.ticker);
    match report.underlying_kind {
        UnderlyingPriceKind::Close => {
            let _ = writeln!(
                out,
                "closing price for {} = {:.2}",
                report.date, report.underlying_price
            );
        }
        UnderlyingPriceKind::LastSale => {
            let _ = writeln!(
                out,
                "last sale price (close for {} unavailable) = {:.2}",
                report.date, report.underlying_price
            );
        }
    }

    let put = &report.put;
    let fallback = put.premium();
    let _ = writeln!(
        out,
        "options premium for selling a put for ${} {} is approx {}-{}",
        put.strike.normalize(),
        put.expiry,
        money(put.bid.or(fallback)),
        money(put.ask.or(fallback)),
    );

    if let Some(warning) = &report.underlying_warning {
        let _ = writeln!(out, "note: {warning}");
    }
    push_sources(&mut out, &report.sources);
    out
}

fn money(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn push_sources(out: &mut String, sources: &[String]) {
    for source in sources {
        let _ = writeln!(out, "source: {source}");
    }
}
