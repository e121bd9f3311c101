//! Menu Cart CLI - shop a vendor catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! menu-cart --catalog burger-place.yaml menu
//!
//! # Add two large burgers with bacon
//! menu-cart --catalog burger-place.yaml add burger-1 --qty 2 --choose Size=Large --choose Extras=Bacon
//!
//! # Show the cart and totals with a coupon
//! menu-cart --catalog burger-place.yaml show --coupon SAVE10
//!
//! # Send the order to the vendor over chat
//! menu-cart --catalog burger-place.yaml checkout chat --name "Maria" --phone 11988887777 \
//!     --street "Rua das Flores" --neighborhood Centro --city "São Paulo" --payment pix
//! ```
//!
//! # Commands
//!
//! - `menu` - List catalog items
//! - `show` - Show the cart and its totals
//! - `add`, `remove`, `set-qty`, `clear` - Change the cart
//! - `favorite` - Star or unstar an item
//! - `checkout chat` - Build the order message and chat link
//! - `checkout submit` - Submit the order to the hosted backend
//!
//! The cart is kept in a JSON session file between invocations
//! (`MENU_CART_SESSION_FILE`, or `--session`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use menu_cart_storefront::telemetry::{DEFAULT_FILTER, init_tracing};

mod catalog;
mod commands;

use commands::Session;
use commands::cart::{LineRef, parse_choice};
use commands::checkout::FormArgs;

#[derive(Parser)]
#[command(name = "menu-cart")]
#[command(author, version, about = "Shop a vendor catalog and check out")]
struct Cli {
    /// Catalog file (YAML)
    #[arg(long, env = "MENU_CART_CATALOG")]
    catalog: PathBuf,

    /// Session file holding the cart (overrides `MENU_CART_SESSION_FILE`)
    #[arg(long)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items
    Menu {
        /// Only items in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only available items on promotion
        #[arg(long, conflicts_with = "category")]
        promotions: bool,

        /// Only starred items
        #[arg(long, conflicts_with_all = ["category", "promotions"])]
        favorites: bool,
    },
    /// Show the cart and its totals
    Show {
        /// Preview totals with a coupon
        #[arg(long)]
        coupon: Option<String>,
    },
    /// Add a catalog item to the cart
    Add {
        /// Catalog item id
        item: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Customization choice, repeatable
        #[arg(long = "choose", value_name = "GROUP=OPTION", value_parser = parse_choice)]
        choices: Vec<(String, String)>,

        /// Special instructions for this line
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a cart line
    Remove {
        /// Line number (as shown by `show`) or line id
        line: LineRef,
    },
    /// Set a line's quantity; zero or less removes it
    SetQty {
        /// Line number (as shown by `show`) or line id
        line: LineRef,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Star or unstar a catalog item
    Favorite {
        /// Catalog item id
        item: String,
    },
    /// Check out the cart
    Checkout {
        #[command(subcommand)]
        channel: CheckoutChannel,
    },
}

#[derive(Subcommand)]
enum CheckoutChannel {
    /// Build the order message and a chat link to the vendor
    Chat(FormArgs),
    /// Submit the order to the hosted backend
    Submit(FormArgs),
}

#[tokio::main]
async fn main() {
    init_tracing(DEFAULT_FILTER);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(&cli.catalog, cli.session)?;

    let output = match cli.command {
        Commands::Menu {
            category,
            promotions,
            favorites,
        } => commands::cart::menu(&session, category.as_deref(), promotions, favorites),
        Commands::Show { coupon } => {
            session.apply_coupon(coupon.as_deref()).await?;
            commands::cart::show(&session)
        }
        Commands::Add {
            item,
            qty,
            choices,
            note,
        } => commands::cart::add(&mut session, &item, qty, &choices, note)?,
        Commands::Remove { line } => commands::cart::remove(&mut session, &line)?,
        Commands::SetQty { line, quantity } => {
            commands::cart::set_quantity(&mut session, &line, quantity)?
        }
        Commands::Clear => commands::cart::clear(&mut session)?,
        Commands::Favorite { item } => commands::cart::favorite(&mut session, &item)?,
        Commands::Checkout { channel } => match channel {
            CheckoutChannel::Chat(args) => commands::checkout::chat(&mut session, &args).await?,
            CheckoutChannel::Submit(args) => commands::checkout::submit(&mut session, &args).await?,
        },
    };

    print(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    println!("{output}");
}
