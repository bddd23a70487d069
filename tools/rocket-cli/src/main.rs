//! Rocket CLI - command line storefront for the RocketShoes cart.
//!
//! Commands:
//! - `rocket products` - List products with in-cart badges
//! - `rocket add` - Add one unit of a product
//! - `rocket remove` - Remove a product from the cart
//! - `rocket set` - Set a product's quantity
//! - `rocket inc` / `rocket dec` - Step a product's quantity
//! - `rocket show` - Show the cart with subtotals and total

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::{AmountArgs, ProductArgs, Rejected};

/// Rocket CLI - Manage a RocketShoes shopping cart
#[derive(Parser)]
#[command(name = "rocket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with how many of each are in the cart
    Products,

    /// Add one unit of a product to the cart
    Add(ProductArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Set the quantity of a product in the cart
    Set(AmountArgs),

    /// Increase a product's quantity by one
    Inc(ProductArgs),

    /// Decrease a product's quantity by one (not below 1)
    Dec(ProductArgs),

    /// Show the cart
    Show,
}

/// Default filter for `--verbose`: this binary plus the cart libraries.
const VERBOSE_FILTER: &str = "rocket=debug,rocket_cart=debug,rocket_data=debug,rocket_cache=debug";

fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Products => "products",
            Commands::Add(_) => "add",
            Commands::Remove(_) => "remove",
            Commands::Set(_) => "set",
            Commands::Inc(_) => "inc",
            Commands::Dec(_) => "dec",
            Commands::Show => "show",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    debug!(cwd = %ctx.cwd.display(), "running {}", cli.command.name());

    // Execute command
    let result = match cli.command {
        Commands::Products => commands::products::run(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Set(args) => commands::cart::set(args, &ctx).await,
        Commands::Inc(args) => commands::cart::step(args, 1, &ctx).await,
        Commands::Dec(args) => commands::cart::step(args, -1, &ctx).await,
        Commands::Show => commands::cart::show(&ctx).await,
    };

    if let Err(e) = result {
        // Rejected cart operations were already shown as toasts.
        match e.downcast_ref::<Rejected>() {
            Some(rejected) => ctx.output.debug(&rejected.to_string()),
            None => ctx.output.error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }

    Ok(())
}
