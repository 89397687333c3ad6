//! Paperfolio CLI — portfolio, statistics, and market data commands.
//!
//! A portfolio lives in a JSON snapshot file (`--snapshot`, default
//! `portfolio.json`). Commands that trade load the snapshot, apply the
//! change, and write it back atomically; reporting commands are read-only.
//!
//! Commands:
//! - `create` — start a new portfolio snapshot
//! - `buy` / `sell` — record trades at a trading-day date
//! - `composition` / `value` / `distribution` — valuation reports
//! - `rebalance` — adjust holdings toward target value weights
//! - `stats` — per-holding statistics across the whole portfolio
//! - `stock` — statistics for a single symbol, no portfolio needed
//! - `fetch` — prime the price cache for a set of symbols

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use paperfolio_core::data::{AlphaVantageProvider, PriceCache};
use paperfolio_core::domain::CalendarDate;
use paperfolio_core::persist::{load_portfolio, save_portfolio};
use paperfolio_core::service::PortfolioService;
use paperfolio_core::stats;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "paperfolio",
    about = "Paperfolio — virtual stock portfolios over daily closing prices"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./paperfolio.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Portfolio snapshot file.
    #[arg(long, global = true, default_value = "portfolio.json")]
    snapshot: PathBuf,

    /// Price cache directory. Overrides the config file.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Alpha Vantage API key. Overrides the config file and environment.
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new portfolio snapshot.
    Create {
        /// Portfolio name.
        name: String,
        /// Owner name.
        owner: String,
    },
    /// Buy whole shares on a trading day.
    Buy {
        /// Ticker symbol (case-insensitive).
        symbol: String,
        /// Number of shares (whole).
        shares: f64,
        /// Trade date (YYYY-MM-DD).
        date: String,
    },
    /// Sell shares (fractional allowed) on a trading day.
    Sell {
        symbol: String,
        shares: f64,
        date: String,
    },
    /// Shares held per symbol as of a date.
    Composition { date: String },
    /// Total portfolio value at a date.
    Value { date: String },
    /// Per-symbol value at a date.
    Distribution { date: String },
    /// Rebalance toward target value weights.
    Rebalance {
        /// Trading day for the rebalance (YYYY-MM-DD).
        date: String,
        /// Target weights, e.g. --weight AAPL=0.4 --weight MSFT=0.6.
        #[arg(long = "weight", required = true)]
        weights: Vec<String>,
    },
    /// Per-holding statistics across the whole portfolio.
    Stats {
        #[command(subcommand)]
        stat: StatCommand,
    },
    /// Statistics for a single symbol, no portfolio needed.
    Stock {
        /// Ticker symbol.
        symbol: String,
        #[command(subcommand)]
        stat: StatCommand,
    },
    /// Prime the price cache for a set of symbols.
    Fetch {
        /// Symbols to fetch (e.g., AAPL MSFT).
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Subcommand)]
enum StatCommand {
    /// Closing price at a date.
    Close { date: String },
    /// Closing-price change over [start, end].
    Change { start: String, end: String },
    /// x-day moving average anchored at a date.
    Average { date: String, window: usize },
    /// Whether every close in [start, end] sits on or above its own
    /// x-day moving average.
    Crossover {
        start: String,
        end: String,
        window: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = CliConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.cache_dir {
        cfg.cache_dir = Some(dir.clone());
    }
    if let Some(key) = &cli.api_key {
        cfg.api_key = Some(key.clone());
    }
    let mut svc = build_service(&cfg);

    match cli.command {
        Commands::Create { name, owner } => run_create(&mut svc, &cli.snapshot, &name, &owner),
        Commands::Buy {
            symbol,
            shares,
            date,
        } => run_trade(&mut svc, &cli.snapshot, Trade::Buy, &symbol, shares, &date),
        Commands::Sell {
            symbol,
            shares,
            date,
        } => run_trade(&mut svc, &cli.snapshot, Trade::Sell, &symbol, shares, &date),
        Commands::Composition { date } => {
            let (name, owner) = attach(&mut svc, &cli.snapshot)?;
            let comp = svc.composition(&name, &owner, parse_date(&date)?)?;
            print_rows(comp.iter().map(|(sym, shares)| (sym.as_str(), format!("{shares} shares"))));
            Ok(())
        }
        Commands::Value { date } => {
            let (name, owner) = attach(&mut svc, &cli.snapshot)?;
            let total = svc.value(&name, &owner, parse_date(&date)?)?;
            println!("{name} is worth ${total:.2} on {date}");
            Ok(())
        }
        Commands::Distribution { date } => {
            let (name, owner) = attach(&mut svc, &cli.snapshot)?;
            let dist = svc.distribution(&name, &owner, parse_date(&date)?)?;
            print_rows(dist.iter().map(|(sym, v)| (sym.as_str(), v.clone())));
            Ok(())
        }
        Commands::Rebalance { date, weights } => {
            run_rebalance(&mut svc, &cli.snapshot, &date, &weights)
        }
        Commands::Stats { stat } => run_stats(&mut svc, &cli.snapshot, stat),
        Commands::Stock { symbol, stat } => run_stock(&mut svc, &symbol, stat),
        Commands::Fetch { symbols } => run_fetch(&mut svc, &symbols),
    }
}

fn build_service(cfg: &CliConfig) -> PortfolioService {
    let provider = match &cfg.base_url {
        Some(url) => AlphaVantageProvider::with_base_url(cfg.api_key(), url),
        None => AlphaVantageProvider::new(cfg.api_key()),
    };
    PortfolioService::new(PriceCache::new(cfg.cache_dir(), Box::new(provider)))
}

fn parse_date(s: &str) -> Result<CalendarDate> {
    s.parse::<CalendarDate>()
        .with_context(|| format!("bad date '{s}'"))
}

/// Loads the snapshot into the service and returns the portfolio identity.
fn attach(svc: &mut PortfolioService, snapshot: &Path) -> Result<(String, String)> {
    if !snapshot.exists() {
        bail!(
            "no snapshot at {} — run `paperfolio create` first",
            snapshot.display()
        );
    }
    let portfolio = load_portfolio(snapshot)?;
    let identity = (portfolio.name().to_string(), portfolio.owner().to_string());
    svc.repository_mut().put(portfolio);
    Ok(identity)
}

fn persist(svc: &PortfolioService, snapshot: &Path, name: &str, owner: &str) -> Result<()> {
    save_portfolio(svc.portfolio(name, owner)?, snapshot)?;
    Ok(())
}

fn run_create(svc: &mut PortfolioService, snapshot: &Path, name: &str, owner: &str) -> Result<()> {
    if snapshot.exists() {
        bail!("snapshot {} already exists", snapshot.display());
    }
    svc.create_portfolio(name, owner)?;
    persist(svc, snapshot, name, owner)?;
    println!("Created portfolio {name} for {owner} at {}", snapshot.display());
    Ok(())
}

enum Trade {
    Buy,
    Sell,
}

fn run_trade(
    svc: &mut PortfolioService,
    snapshot: &Path,
    trade: Trade,
    symbol: &str,
    shares: f64,
    date: &str,
) -> Result<()> {
    let (name, owner) = attach(svc, snapshot)?;
    let date = parse_date(date)?;
    let verb = match trade {
        Trade::Buy => {
            svc.buy(&name, &owner, symbol, shares, date)?;
            "Bought"
        }
        Trade::Sell => {
            svc.sell(&name, &owner, symbol, shares, date)?;
            "Sold"
        }
    };
    persist(svc, snapshot, &name, &owner)?;
    println!("{verb} {shares} {} on {date}", symbol.to_uppercase());
    Ok(())
}

fn run_rebalance(
    svc: &mut PortfolioService,
    snapshot: &Path,
    date: &str,
    weight_args: &[String],
) -> Result<()> {
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();
    for arg in weight_args {
        let Some((symbol, weight)) = arg.split_once('=') else {
            bail!("bad weight '{arg}' (expected SYMBOL=FRACTION, e.g. AAPL=0.4)");
        };
        let weight: f64 = weight
            .parse()
            .with_context(|| format!("bad weight fraction in '{arg}'"))?;
        weights.insert(symbol.to_uppercase(), weight);
    }

    let (name, owner) = attach(svc, snapshot)?;
    let date = parse_date(date)?;
    svc.rebalance(&name, &owner, date, &weights)?;
    persist(svc, snapshot, &name, &owner)?;

    println!("Rebalanced {name} on {date}:");
    let comp = svc.composition(&name, &owner, date)?;
    print_rows(comp.iter().map(|(sym, shares)| (sym.as_str(), format!("{shares} shares"))));
    Ok(())
}

fn run_stats(svc: &mut PortfolioService, snapshot: &Path, stat: StatCommand) -> Result<()> {
    let (name, owner) = attach(svc, snapshot)?;
    let rows = match stat {
        StatCommand::Close { date } => svc.all_closing_prices(&name, &owner, parse_date(&date)?)?,
        StatCommand::Change { start, end } => {
            svc.all_price_changes(&name, &owner, parse_date(&start)?, parse_date(&end)?)?
        }
        StatCommand::Average { date, window } => {
            svc.all_moving_averages(&name, &owner, parse_date(&date)?, window)?
        }
        StatCommand::Crossover { start, end, window } => {
            svc.all_crossovers(&name, &owner, parse_date(&start)?, parse_date(&end)?, window)?
        }
    };
    print_rows(rows.iter().map(|(sym, v)| (sym.as_str(), v.clone())));
    Ok(())
}

fn run_stock(svc: &mut PortfolioService, symbol: &str, stat: StatCommand) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let prices = svc.prices_mut();
    match stat {
        StatCommand::Close { date } => {
            let close = prices.series(&symbol)?.closing_price(parse_date(&date)?)?;
            println!("{symbol} closed at ${close:.2} on {date}");
        }
        StatCommand::Change { start, end } => {
            let series = prices.series(&symbol)?;
            let change = stats::price_change(series, parse_date(&start)?, parse_date(&end)?)?;
            println!("{symbol} moved ${change:.2} from {start} to {end}");
        }
        StatCommand::Average { date, window } => {
            let series = prices.series(&symbol)?;
            let average = stats::moving_average(series, parse_date(&date)?, window)?;
            println!("{symbol} {window}-day average at {date}: ${average:.2}");
        }
        StatCommand::Crossover { start, end, window } => {
            let series = prices.series(&symbol)?;
            let crossed =
                stats::crossover(series, parse_date(&start)?, parse_date(&end)?, window)?;
            println!(
                "{symbol} {window}-day crossover over {start}..{end}: {}",
                if crossed { "Yes" } else { "No" }
            );
        }
    }
    Ok(())
}

fn run_fetch(svc: &mut PortfolioService, symbols: &[String]) -> Result<()> {
    let prices = svc.prices_mut();
    let mut failures = 0;
    for symbol in symbols {
        match prices.prime(symbol) {
            Ok(bars) => println!("{}: {bars} trading days cached", symbol.to_uppercase()),
            Err(err) => {
                eprintln!("Error for {}: {err}", symbol.to_uppercase());
                failures += 1;
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_rows<'a>(rows: impl Iterator<Item = (&'a str, String)>) {
    let mut empty = true;
    for (symbol, value) in rows {
        println!("{symbol:<8} {value}");
        empty = false;
    }
    if empty {
        println!("(empty)");
    }
}
