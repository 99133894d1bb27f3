//! Till command line
//!
//! Builds a cart, prints the order table and the amount to pay.
//!
//! Use `-o` to load an order sheet from a YAML file instead of the demo order
//! Use `-l` (or `RUST_LOG`) to set the log level

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use rusty_money::{Money, iso::IDR};
use tracing::info;
use tracing_subscriber::EnvFilter;

use till::{cart::Cart, fixtures::OrderFixture};

/// Till command line arguments
#[derive(Debug, Parser)]
#[command(name = "till", about = "Render a shopping cart and its discounted total", long_about = None)]
struct Args {
    /// YAML order sheet to load instead of the demo order
    #[arg(short, long, env = "TILL_ORDER")]
    order: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn demo_cart() -> Cart<'static> {
    let mut cart = Cart::new("Andi");

    cart.add_items([
        ("Ayam Goreng", 2, Money::from_major(20_000, IDR)),
        ("Pasta Gigi", 3, Money::from_major(15_000, IDR)),
    ]);

    cart
}

/// Till entry point
fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let cart = match args.order.as_deref() {
        Some(path) => OrderFixture::from_path(path)?.cart()?,
        None => demo_cart(),
    };

    info!(owner = cart.owner_name(), items = cart.len(), "cart ready");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    cart.render_order()?.write_to(&mut handle)?;
    cart.compute_total()?.write_to(&mut handle)?;

    Ok(())
}
