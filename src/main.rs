use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;
use uistore_scraper::{ProductAvailability, StockError, Url};

/// Product page checked when no urls are given on the command line.
const DEFAULT_PRODUCT_URL: &str =
    "https://uk.store.ui.com/uk/en/category/wifi-special-devices/products/utr";

#[derive(Debug, Parser)]
#[command(name = "uistore_scraper")]
#[command(about = "Check Ubiquiti store product stock")]
struct Cli {
    /// Product page urls to check.
    urls: Vec<String>,

    /// Keep polling until a product comes in stock.
    #[arg(long)]
    watch: bool,

    /// Seconds between polls in watch mode.
    #[arg(long, env = "STOCK_POLL_SECONDS", default_value_t = 300)]
    interval: u64,

    /// Stop watching after this many consecutive failed checks (0 = never).
    #[arg(long, default_value_t = 0)]
    max_errors: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let urls = match parse_urls(&cli.urls) {
        Ok(urls) => urls,
        Err(report) => {
            eprintln!("{report:#}");
            return ExitCode::from(1);
        }
    };

    if !cli.watch {
        return match check_once(&urls).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(2),
            Err(err) => {
                eprintln!("failed to check stock: {err}");
                ExitCode::from(1)
            }
        };
    }

    watch(&urls, cli.interval, cli.max_errors).await
}

/// Polls until some product is in stock (exit 0), the error budget is
/// spent (exit 1), or the user interrupts (exit 130). Interruption is
/// observed between iterations, never mid-request.
async fn watch(urls: &[Url], interval: u64, max_errors: u32) -> ExitCode {
    println!(
        "Watching {} page(s) every {interval} seconds. Ctrl+C to stop.",
        urls.len()
    );

    let mut consecutive_errors = 0u32;
    loop {
        print!("[{}] ", chrono::Local::now().format("%H:%M:%S"));
        let _ = std::io::stdout().flush();

        match check_once(urls).await {
            Ok(true) => return ExitCode::SUCCESS,
            Ok(false) => consecutive_errors = 0,
            Err(err) => {
                eprintln!("failed to check stock: {err}");
                consecutive_errors += 1;
                if max_errors > 0 && consecutive_errors >= max_errors {
                    eprintln!("giving up after {consecutive_errors} consecutive failures");
                    return ExitCode::from(1);
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                return ExitCode::from(130);
            }
        }
    }
}

/// One pass over every url. True when any product is in stock.
///
/// The first failure aborts the pass; the caller decides whether to
/// retry on the next interval or give up.
async fn check_once(urls: &[Url]) -> Result<bool, StockError> {
    let mut any_in_stock = false;
    for url in urls {
        let availability = ProductAvailability::fetch(url.clone()).await?;
        report(url, &availability);
        any_in_stock |= availability.in_stock;
    }
    Ok(any_in_stock)
}

fn report(url: &Url, availability: &ProductAvailability) {
    let name = availability
        .name
        .clone()
        .or_else(|| page_slug(url))
        .unwrap_or_else(|| url.to_string());

    if availability.in_stock {
        // \u{7} rings the terminal bell
        println!("{name} is AVAILABLE \u{7}");
    } else if availability.is_coming_soon() {
        match availability.expected_date {
            Some(date) => println!("{name} is coming soon (expected {date})"),
            None => println!("{name} is coming soon"),
        }
    } else {
        println!("{name} status: {}", availability.status);
    }
}

fn parse_urls(args: &[String]) -> Result<Vec<Url>> {
    if args.is_empty() {
        return Ok(vec![Url::parse(DEFAULT_PRODUCT_URL)?]);
    }
    args.iter()
        .map(|raw| Url::parse(raw).wrap_err_with(|| format!("invalid product url: {raw}")))
        .collect()
}

/// Last path segment of the product url, e.g. `utr`.
fn page_slug(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
        .map(str::to_string)
}
