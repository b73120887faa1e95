//! Command line interface.
//!
//! Query subcommands run once against the options desk and print either text
//! or JSON to stdout. `serve` is handled by the binary.

pub mod render;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::{OptionChainPort, PriceHistoryPort};
use crate::application::services::{CoveredCallRequest, OptionsDeskService, local_today};
use crate::domain::options::OptionRight;
use crate::error::AppError;

/// Option strike and premium lookup by target delta.
#[derive(Parser, Debug)]
#[command(name = "strike-finder", version, about)]
pub struct Cli {
    /// YAML config file (default: ./config.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Print JSON for every command.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// One-shot lookups.
    #[command(flatten)]
    Query(QueryCommand),

    /// Start the HTTP API.
    Serve(ServeArgs),
}

/// `serve` overrides.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides server.bind_address).
    #[arg(long)]
    pub bind: Option<String>,

    /// HTTP port (overrides server.http_port).
    #[arg(long)]
    pub port: Option<u16>,
}

/// Lookups against the upstream providers.
#[derive(Subcommand, Debug, Clone)]
pub enum QueryCommand {
    /// Close on a date, or the latest price.
    Price {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Trading date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Daily close on a date.
    Close {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Trading date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
    },

    /// Quote for one listed put.
    PutPremium {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
        /// Listed strike.
        #[arg(long)]
        strike: Decimal,
    },

    /// Quote for one listed call.
    CallPremium {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
        /// Listed strike.
        #[arg(long)]
        strike: Decimal,
    },

    /// Strike and premium for a target delta on one expiry.
    DeltaStrike {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
        /// put or call.
        #[arg(long, default_value_t = OptionRight::Put)]
        right: OptionRight,
        /// Target delta (negative for puts).
        #[arg(long, default_value = "-0.20", allow_negative_numbers = true)]
        target_delta: Decimal,
    },

    /// Strike and premium for a target delta, defaulting to the nearest expiry.
    StrikePremium {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Target delta (negative for puts).
        #[arg(long, allow_negative_numbers = true)]
        target_delta: Decimal,
        /// put or call.
        #[arg(long, default_value_t = OptionRight::Put)]
        right: OptionRight,
        /// Expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: Option<NaiveDate>,
        /// Reference date for the nearest expiry (default: today).
        #[arg(long)]
        asof: Option<NaiveDate>,
    },

    /// Covered call breakeven and returns.
    CoveredCall {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
        /// Analysis date (default: today).
        #[arg(long)]
        asof: Option<NaiveDate>,
        /// Spot override (default: latest price).
        #[arg(long)]
        spot: Option<Decimal>,
        /// Call strike (default: chosen by delta).
        #[arg(long)]
        strike: Option<Decimal>,
        /// Target call delta when no strike is given.
        #[arg(long, default_value = "0.20", allow_negative_numbers = true)]
        target_delta: Decimal,
        /// Shares held, a multiple of 100.
        #[arg(long, default_value_t = 100)]
        shares: u32,
    },

    /// Close on a date plus a put quote, in a short text report.
    Case {
        /// Underlying ticker.
        #[arg(long)]
        ticker: String,
        /// Trading date for the close (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Put expiration date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
        /// Put strike.
        #[arg(long)]
        strike: Decimal,
    },
}

/// CLI failures.
#[derive(Debug, Error)]
pub enum CliError {
    /// The lookup failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// The report could not be rendered.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Run one query and return what to print.
pub async fn execute<C, H>(
    desk: &OptionsDeskService<C, H>,
    command: QueryCommand,
    force_json: bool,
) -> Result<String, CliError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let output = match command {
        QueryCommand::Price { ticker, date } => {
            let report = desk.price(&ticker, date).await?;
            if force_json {
                render::json(&report)?
            } else {
                render::price(&report)
            }
        }
        QueryCommand::Close { ticker, date } => {
            render::json(&desk.close_price(&ticker, date).await?)?
        }
        QueryCommand::PutPremium {
            ticker,
            expiry,
            strike,
        } => render::json(&desk.put_premium(&ticker, expiry, strike).await?)?,
        QueryCommand::CallPremium {
            ticker,
            expiry,
            strike,
        } => render::json(
            &desk
                .option_premium(&ticker, expiry, strike, OptionRight::Call)
                .await?,
        )?,
        QueryCommand::DeltaStrike {
            ticker,
            expiry,
            right,
            target_delta,
        } => {
            let report = desk
                .delta_strike(&ticker, expiry, right, target_delta)
                .await?;
            if force_json {
                render::json(&report)?
            } else {
                render::delta_strike(&report)
            }
        }
        QueryCommand::StrikePremium {
            ticker,
            target_delta,
            right,
            expiry,
            asof,
        } => {
            let asof = asof.unwrap_or_else(local_today);
            let report = desk
                .strike_premium(&ticker, right, target_delta, expiry, asof)
                .await?;
            if force_json {
                render::json(&report)?
            } else {
                render::delta_strike(&report)
            }
        }
        QueryCommand::CoveredCall {
            ticker,
            expiry,
            asof,
            spot,
            strike,
            target_delta,
            shares,
        } => {
            let report = desk
                .covered_call(CoveredCallRequest {
                    ticker,
                    expiry,
                    asof: asof.unwrap_or_else(local_today),
                    spot,
                    strike,
                    target_delta,
                    shares,
                })
                .await?;
            render::json(&report)?
        }
        QueryCommand::Case {
            ticker,
            date,
            expiry,
            strike,
        } => {
            let report = desk.case_report(&ticker, date, expiry, strike).await?;
            if force_json {
                render::json(&report)?
            } else {
                render::case(&report)
            }
        }
    };
    Ok(output)
}
