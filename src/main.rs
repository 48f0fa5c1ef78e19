//! Storefront product scraper CLI
//!
//! Walks a shop's listing pages, extracts every product into a fixed
//! 23-column schema, and writes one CSV at the end of the run.

use std::path::PathBuf;
use std::process::ExitCode;

use shopscrape::{DetailFetchMode, LogProgress, ScrapeConfig, ScrapeError, pipeline};

const USAGE: &str = "\
Usage: shopscrape <start-url> [options]

Options:
  --output <file>    CSV output path (default: products.csv)
  --http             Fetch detail pages over plain HTTP instead of the browser
  --headed           Run the browser with a visible window (debug builds)
  --max-pages <n>    Stop after walking this many listing pages
  --max-items <n>    Stop after extracting this many products
  -h, --help         Show this help

Exit codes: 0 success, 1 scrape failed, 2 usage error, 3 no products found";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let config = match parse_args(args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match pipeline::run(&config, &LogProgress).await {
        Ok(summary) => {
            println!(
                "Extracted {} of {} products -> {}",
                summary.extracted,
                summary.discovered,
                summary.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e @ ScrapeError::NoData { .. }) => {
            eprintln!("{e}");
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("Scrape failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logging with chromiumoxide spam reduction
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        .add_directive(
            "chromiumoxide::handler=off"
                .parse()
                .expect("BUG: hardcoded log directive is invalid"),
        )
        .add_directive(
            "chromiumoxide::conn=off"
                .parse()
                .expect("BUG: hardcoded log directive is invalid"),
        );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn parse_args(args: Vec<String>) -> Result<ScrapeConfig, String> {
    let mut start_url: Option<String> = None;
    let mut output: Option<PathBuf> = None;
    let mut detail_fetch = DetailFetchMode::Browser;
    let mut headless = true;
    let mut max_pages: Option<usize> = None;
    let mut max_items: Option<usize> = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--output requires a file path".to_string())?;
                output = Some(PathBuf::from(value));
            }
            "--http" => detail_fetch = DetailFetchMode::Http,
            "--headed" => headless = false,
            "--max-pages" => max_pages = Some(parse_count(args.next(), "--max-pages")?),
            "--max-items" => max_items = Some(parse_count(args.next(), "--max-items")?),
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option '{flag}'"));
            }
            url => {
                if start_url.is_some() {
                    return Err("more than one start URL given".to_string());
                }
                start_url = Some(url.to_string());
            }
        }
    }

    let start_url = start_url.ok_or_else(|| "missing required <start-url>".to_string())?;

    let mut builder = ScrapeConfig::builder()
        .start_url(start_url)
        .headless(headless)
        .detail_fetch(detail_fetch)
        .max_pages(max_pages)
        .max_items(max_items);
    if let Some(output) = output {
        builder = builder.output_path(output);
    }

    builder.build().map_err(|e| e.to_string())
}

fn parse_count(value: Option<String>, flag: &str) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{flag} requires a number"))?;
    let count = value
        .parse::<usize>()
        .map_err(|_| format!("{flag} expects a whole number, got '{value}'"))?;
    if count == 0 {
        return Err(format!("{flag} must be at least 1"));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_url_and_flags_parse() {
        let config = parse_args(args(&[
            "shop.example.com/store",
            "--output",
            "out/items.csv",
            "--http",
            "--max-pages",
            "5",
        ]))
        .expect("valid args should parse");

        assert_eq!(config.start_url(), "https://shop.example.com/store");
        assert_eq!(config.output_path(), PathBuf::from("out/items.csv"));
        assert_eq!(config.detail_fetch(), DetailFetchMode::Http);
        assert_eq!(config.max_pages(), Some(5));
        assert_eq!(config.max_items(), None);
    }

    #[test]
    fn missing_url_is_a_usage_error() {
        let err = parse_args(args(&["--http"])).expect_err("no URL must fail");
        assert!(err.contains("start-url"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = parse_args(args(&["shop.example.com", "--threads", "4"]))
            .expect_err("unknown flag must fail");
        assert!(err.contains("--threads"));
    }

    #[test]
    fn zero_counts_are_rejected() {
        let err = parse_args(args(&["shop.example.com", "--max-items", "0"]))
            .expect_err("zero must fail");
        assert!(err.contains("--max-items"));
    }
}
