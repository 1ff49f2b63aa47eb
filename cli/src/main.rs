//! CLI entry point for the Kuna.io exchange tool.

mod commands;
mod config;
mod format;

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kuna::{KunaClient, Market, Side, Signer};

use crate::commands::{Options, parse_limit, parse_side};
use crate::config::{Config, Settings};
use crate::format::TimeStyle;

#[derive(Parser)]
#[command(name = "kuna")]
#[command(about = "Kuna.io exchange client: market data, order book depth and order management")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Market to operate on (btcuah, ethuah) [default: btcuah]
    #[arg(long, global = true, env = "KUNAIO_MARKET")]
    market: Option<Market>,

    /// API access key
    #[arg(long, global = true, env = "KUNAIO_ACCESS_KEY", hide_env_values = true)]
    akey: Option<String>,

    /// API secret key
    #[arg(long, global = true, env = "KUNAIO_SECRET_KEY", hide_env_values = true)]
    skey: Option<String>,

    /// Treat LIMIT and VOLUME as UAH amounts instead of base currency
    #[arg(long, global = true)]
    uah: bool,

    /// Print date/time as Unix timestamps
    #[arg(long, global = true)]
    unix: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show current server time
    Time,

    /// Show latest trade statistics
    Stats,

    /// Show order book asks, optionally up to LIMIT
    Sell {
        #[arg(value_parser = parse_limit)]
        limit: Option<f64>,
    },

    /// Show order book bids, optionally up to LIMIT
    Buy {
        #[arg(value_parser = parse_limit)]
        limit: Option<f64>,
    },

    /// Show trade history
    History,

    /// Show user info and assets
    Userinfo,

    /// Show current orders for user
    Userorders,

    /// Show history of user trades
    Usertrades,

    /// Create a new limit order
    Addorder {
        /// buy or sell
        #[arg(value_parser = parse_side)]
        side: Side,
        /// Amount in base currency (in UAH with --uah)
        volume: f64,
        /// Price for one unit of base currency
        price: f64,
    },

    /// Delete an existing order
    Delorder {
        /// Order ID
        id: i64,
    },

    /// Delete all existing orders on the market
    Delall,
}

fn init_logging() {
    let default = if std::env::var_os("KUNAIO_DEBUG").is_some() {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = Settings::resolve(file, cli.market, cli.akey, cli.skey)?;

    let mut client = KunaClient::new(&settings.client).context("build HTTP client")?;
    if cli.command.is_private() {
        let (access, secret) = settings.keys()?;
        client = client.with_signer(Signer::new(access, secret)?);
    }

    let opts = Options {
        market: settings.market,
        uah: cli.uah,
        time: if cli.unix {
            TimeStyle::Unix
        } else {
            TimeStyle::Local
        },
    };
    commands::execute(&client, &cli.command, &opts, &mut io::stdout().lock())
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
