mod app;
mod ui;

use std::path::PathBuf;

use app::BseDashApp;
use bsedash_data::metrics::{format_percent, format_price, format_signed_percent};
use bsedash_data::{
    download_bhavcopy, download_bhavcopy_for_today, fetch_live_quote, latest_snapshot, BhavCopy,
    DashboardConfig, FetchState, ReqwestTransport,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "bsedash")]
#[command(about = "BSE Bhav Copy and live quote dashboard", long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dated snapshot files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the Bhav Copy for a date (default: today)
    Fetch {
        /// Date as YYYYMMDD
        #[arg(short, long, value_parser = parse_date_key)]
        date: Option<NaiveDate>,
    },
    /// Print a live quote for a BSE ticker
    Quote {
        /// Ticker without exchange suffix (e.g., RELIANCE, TCS)
        #[arg(default_value = "RELIANCE")]
        symbol: String,
    },
    /// Print open/close and percentage change for one instrument of a snapshot
    Show {
        /// Instrument name as in the FinInstrmNm column
        name: String,
        /// Snapshot file to read (default: latest dated snapshot, then the sample)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_date_key(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, bsedash_data::models::DATE_KEY_FORMAT)
        .map_err(|e| format!("expected YYYYMMDD: {}", e))
}

fn fetch_mode(config: &DashboardConfig, date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let transport = ReqwestTransport::from_config(config)?;
    let result = match date {
        Some(date) => download_bhavcopy(
            &transport,
            &config.snapshot_url_template,
            &config.data_dir,
            date,
        ),
        None => download_bhavcopy_for_today(&transport, config),
    };

    match FetchState::from_result(&result) {
        FetchState::Fetched(snapshot) => {
            println!("✓ Bhav copy saved to: {}", snapshot.path.display());
        }
        FetchState::Failed(failure) => println!("✗ {}", failure),
        FetchState::NotFetched => {}
    }
    Ok(())
}

fn quote_mode(config: &DashboardConfig, symbol: &str) -> Result<(), Box<dyn std::error::Error>> {
    let transport = ReqwestTransport::from_config(config)?;
    let quote = fetch_live_quote(&transport, &config.quote_url_template, symbol)?;
    let price = quote.price()?;
    let change = quote.change_percent()?;

    println!("{}", quote.symbol);
    println!("  Current:    {}", format_price(price));
    if let Some(prev) = quote.previous_close {
        println!("  Prev Close: {}", format_price(prev));
    }
    if let Some(open) = quote.open_price {
        println!("  Open:       {}", format_price(open));
    }
    println!("  Change:     {}", format_signed_percent(change));
    Ok(())
}

fn show_mode(
    config: &DashboardConfig,
    name: &str,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = match file {
        Some(path) => path,
        None => latest_snapshot(&config.data_dir)?
            .map(|s| s.path)
            .unwrap_or_else(|| config.sample_file()),
    };
    info!("Reading snapshot {}", path.display());

    let table = BhavCopy::from_path(&path)?;
    let row = table.find(name)?;
    let change = row.change_percent()?;

    println!("{} ({})", row.name, path.display());
    println!("  Open:   {:.2}", row.open);
    println!("  Close:  {:.2}", row.close);
    println!("  Change: {}", format_percent(change));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Some(Commands::Fetch { date }) => fetch_mode(&config, date),
        Some(Commands::Quote { symbol }) => quote_mode(&config, &symbol),
        Some(Commands::Show { name, file }) => show_mode(&config, &name, file),
        None => {
            // Fetch once before the window opens; the dashboard reads
            // whatever is on disk regardless of the outcome.
            let app = BseDashApp::startup(config);

            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1200.0, 800.0])
                    .with_min_inner_size([800.0, 600.0]),
                ..Default::default()
            };

            eframe::run_native(
                "BSE Dashboard",
                options,
                Box::new(|_cc| Ok(Box::new(app))),
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fetch_date() {
        let cli = Cli::try_parse_from(["bsedash", "fetch", "--date", "20250704"]).unwrap();
        match cli.command {
            Some(Commands::Fetch { date }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 4));
            }
            _ => panic!("expected fetch"),
        }
        assert!(Cli::try_parse_from(["bsedash", "fetch", "--date", "2025-07-04"]).is_err());
    }

    #[test]
    fn global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["bsedash", "show", "ABC LTD", "--data-dir", "snaps"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("snaps")));
    }
}
