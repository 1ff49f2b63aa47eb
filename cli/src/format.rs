//! Fixed-width text rendering for command output.

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};

use kuna::stats::{avg_funds, avg_price, avg_volume, running_totals};
use kuna::{DepthRow, HistoryEntry, Order, Stats, Summary, Trade, UserInfo};

const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// How timestamps are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeStyle {
    /// Local time, `2017-08-28T15:34:56+0300`.
    #[default]
    Local,
    /// Seconds since the Unix epoch.
    Unix,
}

impl TimeStyle {
    pub fn render(self, t: DateTime<Utc>) -> String {
        match self {
            TimeStyle::Unix => t.timestamp().to_string(),
            TimeStyle::Local => t.with_timezone(&Local).format(TIME_LAYOUT).to_string(),
        }
    }
}

pub fn stats(out: &mut impl Write, s: &Stats, ts: TimeStyle) -> io::Result<()> {
    writeln!(out, "at:     {}", ts.render(s.at))?;
    writeln!(out, "buy:    {:.7}", s.buy)?;
    writeln!(out, "sell:   {:.7}", s.sell)?;
    writeln!(out, "low:    {:.7}", s.low)?;
    writeln!(out, "high:   {:.7}", s.high)?;
    writeln!(out, "last:   {:.7}", s.last)?;
    writeln!(out, "volume: {:.7}", s.volume)?;
    writeln!(out, "amount: {:.7}", s.amount)
}

/// Depth table for one side of the book. `label` is `SELL` or `BUY`.
pub fn depth(out: &mut impl Write, label: &str, rows: &[DepthRow]) -> io::Result<()> {
    let width = 15usize.saturating_sub(label.len() + 1);
    writeln!(
        out,
        "{label}:{:>width$} {:>15} {:>15} {:>15} {:>15} {:>15}",
        "PRICE", "VOLUME", "FUNDS", "AVG_PRICE", "SUM_VOLUME", "SUM_FUNDS"
    )?;
    for r in rows {
        writeln!(
            out,
            "{:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7}",
            r.price, r.volume, r.funds, r.avg_price, r.cum_volume, r.cum_funds
        )?;
    }
    Ok(())
}

/// Public deals followed by TOTAL, MIN, AVG and MAX lines.
pub fn history(out: &mut impl Write, deals: &[HistoryEntry], ts: TimeStyle) -> io::Result<()> {
    writeln!(out, "{:>24} {:>15} {:>15} {:>15}", "WHEN", "PRICE", "VOLUME", "FUNDS")?;
    for d in deals {
        writeln!(
            out,
            "{:>24} {:15.7} {:15.7} {:15.7}",
            ts.render(d.created_at),
            d.price,
            d.volume,
            d.funds
        )?;
    }
    let s = Summary::of(deals);
    writeln!(out, "TOTAL{:51.7} {:15.7}", s.sum_volume, s.sum_funds)?;
    writeln!(out, "MIN{:37.7} {:15.7} {:15.7}", s.price.min, s.volume.min, s.funds.min)?;
    writeln!(out, "AVG{:37.7} {:15.7} {:15.7}", s.price.avg, s.volume.avg, s.funds.avg)?;
    writeln!(out, "MAX{:37.7} {:15.7} {:15.7}", s.price.max, s.volume.max, s.funds.max)
}

pub fn user_info(out: &mut impl Write, info: &UserInfo) -> io::Result<()> {
    writeln!(out, "email:\t{}", info.email)?;
    writeln!(out, "active:\t{}", info.activated)?;
    writeln!(out, "Accounts: {:>6} {:>15} {:>15}", "CURRENCY", "BALANCE", "LOCKED")?;
    for a in &info.accounts {
        writeln!(out, "{:>18} {:15.7} {:15.7}", a.currency, a.balance, a.locked)?;
    }
    Ok(())
}

pub fn user_orders(out: &mut impl Write, orders: &[Order], ts: TimeStyle) -> io::Result<()> {
    writeln!(
        out,
        "{:>24} {:>8} {:>4} {:>8} {:>15} {:>15} {:>15} {:>15} {:>15} {:>15} {:>15} {:>15} {:>6}",
        "WHEN",
        "MARKET",
        "SIDE",
        "ID",
        "PRICE",
        "AVG_PRICE",
        "VOLUME",
        "FUNDS",
        "REMAINING",
        "REM_FUNDS",
        "EXECUTED",
        "EXEC_FUNDS",
        "TRADES"
    )?;
    for o in orders {
        writeln!(
            out,
            "{:>24} {:>8} {:>4} {:8} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:6}",
            ts.render(o.created_at),
            o.market,
            o.side.as_str(),
            o.id,
            o.price,
            o.avg_price,
            o.volume,
            o.volume * o.price,
            o.remaining_volume,
            o.remaining_volume * o.price,
            o.executed_volume,
            o.executed_volume * o.price,
            o.trades_count
        )?;
    }
    Ok(())
}

/// The user's fills with running totals, then an AVERAGE line.
pub fn user_trades(out: &mut impl Write, trades: &[Trade], ts: TimeStyle) -> io::Result<()> {
    writeln!(
        out,
        "{:>24} {:>4} {:>15} {:>15} {:>15} {:>15} {:>15} {:>15}",
        "WHEN", "SIDE", "PRICE", "VOLUME", "FUNDS", "AVG_PRICE", "SUM_VOLUME", "SUM_FUNDS"
    )?;
    for (t, run) in trades.iter().zip(running_totals(trades)) {
        writeln!(
            out,
            "{:>24} {:>4} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7} {:15.7}",
            ts.render(t.created_at),
            t.side.as_str(),
            t.price,
            t.volume,
            t.funds,
            run.avg_price,
            run.cum_volume,
            run.cum_funds
        )?;
    }
    writeln!(
        out,
        "AVERAGE{:38.7} {:15.7} {:15.7}",
        avg_price(trades),
        avg_volume(trades),
        avg_funds(trades)
    )
}

/// One order as an indented key/value block under `title`.
pub fn order(out: &mut impl Write, title: &str, o: &Order, ts: TimeStyle) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    writeln!(out, "  ID             : {}", o.id)?;
    writeln!(out, "  Side           : {}", o.side)?;
    writeln!(out, "  OrdType        : {}", o.order_type)?;
    writeln!(out, "  Price          : {:16.8}", o.price)?;
    writeln!(out, "  AvgPrice       : {:16.8}", o.avg_price)?;
    writeln!(out, "  State          : {}", o.state)?;
    writeln!(out, "  Market         : {}", o.market)?;
    writeln!(out, "  CreatedAt      : {}", ts.render(o.created_at))?;
    writeln!(out, "  Volume         : {:16.8}", o.volume)?;
    writeln!(out, "  RemainingVolume: {:16.8}", o.remaining_volume)?;
    writeln!(out, "  ExecutedVolume : {:16.8}", o.executed_volume)?;
    writeln!(out, "  TradesCount    : {}", o.trades_count)
}
