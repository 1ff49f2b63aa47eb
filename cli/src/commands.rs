//! Command execution against any [`Transport`].

use std::io::Write;

use anyhow::{Context, Result, bail};
use log::info;

use kuna::transport::Transport;
use kuna::{Ceiling, KunaClient, Market, Side};

use crate::Command;
use crate::format::{self, TimeStyle};

/// Per-invocation switches shared by every command.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub market: Market,
    /// Limits and volumes are in UAH (quote currency) rather than base units.
    pub uah: bool,
    pub time: TimeStyle,
}

impl Command {
    /// Whether the command needs signed requests.
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Command::Userinfo
                | Command::Userorders
                | Command::Usertrades
                | Command::Addorder { .. }
                | Command::Delorder { .. }
                | Command::Delall
        )
    }
}

pub fn execute<T: Transport>(
    client: &KunaClient<T>,
    command: &Command,
    opts: &Options,
    out: &mut impl Write,
) -> Result<()> {
    let market = opts.market;
    match command {
        Command::Time => {
            let t = client.server_time().context("get server time")?;
            writeln!(out, "{}", opts.time.render(t))?;
        }
        Command::Stats => {
            let s = client.stats(market).context("get stats")?;
            format::stats(out, &s, opts.time)?;
        }
        Command::Sell { limit } => {
            let book = client.order_book(market).context("get order book")?;
            let rows = book.ask_depth(Ceiling::new(limit.unwrap_or(0.0), opts.uah));
            format::depth(out, "SELL", &rows)?;
        }
        Command::Buy { limit } => {
            let book = client.order_book(market).context("get order book")?;
            let rows = book.bid_depth(Ceiling::new(limit.unwrap_or(0.0), opts.uah));
            format::depth(out, "BUY", &rows)?;
        }
        Command::History => {
            let deals = client.trade_history(market).context("get trade history")?;
            format::history(out, &deals, opts.time)?;
        }
        Command::Userinfo => {
            let info = client.user_info().context("get user info")?;
            format::user_info(out, &info)?;
        }
        Command::Userorders => {
            let orders = client.user_orders(market).context("get user orders")?;
            format::user_orders(out, &orders, opts.time)?;
        }
        Command::Usertrades => {
            let trades = client.user_trades(market).context("get user trades")?;
            format::user_trades(out, &trades, opts.time)?;
        }
        Command::Addorder {
            side,
            volume,
            price,
        } => {
            let volume = order_volume(*volume, *price, opts.uah)?;
            let order = client
                .new_order(market, *side, volume, *price)
                .context("new order")?;
            info!("order {} created", order.id);
            format::order(out, "Order created", &order, opts.time)?;
        }
        Command::Delorder { id } => {
            let order = client.cancel_order(*id).context("cancel order")?;
            format::order(out, "Order deleted", &order, opts.time)?;
        }
        Command::Delall => {
            let orders = client.cancel_all(market).context("cancel all orders")?;
            for order in &orders {
                format::order(out, "Order deleted", order, opts.time)?;
            }
        }
    }
    Ok(())
}

/// Base-currency volume for a new order; with `uah` the input is funds.
fn order_volume(volume: f64, price: f64, uah: bool) -> Result<f64> {
    if price.is_nan() || price <= 0.0 {
        bail!("invalid PRICE arg ({price}): must be positive");
    }
    if volume.is_nan() || volume <= 0.0 {
        bail!("invalid VOLUME arg ({volume}): must be positive");
    }
    Ok(if uah { volume / price } else { volume })
}

/// clap parser for LIMIT: a non-negative number.
pub fn parse_limit(s: &str) -> std::result::Result<f64, String> {
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 => Ok(f),
        Ok(_) => Err(format!("invalid limit ({s}): must not be negative")),
        Err(e) => Err(format!("invalid limit ({s}): {e}")),
    }
}

/// clap parser for SIDE.
pub fn parse_side(s: &str) -> std::result::Result<Side, String> {
    s.parse::<Side>()
        .map_err(|_| format!("invalid SIDE arg ({s}). Valid values are: sell, buy"))
}
