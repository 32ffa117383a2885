//! MeteoSpain CLI - hourly weather forecasts for Spanish municipalities
//!
//! Resolves a municipality to its 5-digit location code, fetches the hourly
//! forecast from AEMET OpenData and prints it as a table or JSON.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meteospain::cli::{self, Cli};
use meteospain::data::{ForecastClient, ForecastSeries};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let location_code = cli::resolve_location_code(&args)?;

    let client = ForecastClient::new(args.api_key.clone())
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let mut series = client.get_forecast(&location_code).await?;

    if let Some(days) = args.days {
        series.days.truncate(days);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        print_table(&series);
    }
    Ok(())
}

/// Prints the forecast as one table per day
fn print_table(series: &ForecastSeries) {
    println!("Forecast for municipality {}", series.location_code);
    for day in &series.days {
        println!("\n{}", day.date);
        println!(
            "{:<6} {:>7} {:>5} {:>7} {:>7}  Sky",
            "Hour", "Temp", "Hum", "Wind", "Precip"
        );
        for hour in &day.hours {
            println!(
                "{:<6} {:>6.1}\u{b0} {:>4}% {:>7.1} {:>6}%  {}",
                hour.hour,
                hour.temperature,
                hour.humidity,
                hour.wind_speed,
                hour.precipitation,
                hour.description
            );
        }
    }
}
