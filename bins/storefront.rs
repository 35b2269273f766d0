use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configs::AppConfig;
use dotenvy::dotenv;
use models::{CardType, DeliveryAddress, ProductDescriptor, SignUpRequest};
use service::api::HttpApiClient;
use service::catalog::add_product_to_cart;
use service::checkout::CheckoutDraft;
use service::file::local_storage::FileKvStorage;
use service::storage::KvStorage;
use service::Storefront;
use tracing::{error, info};

/// storefront - wholesale cart from the command line
#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product line (merged with an existing line of the same id)
    Add {
        id: String,
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        stock: u32,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        variant: Option<String>,
    },

    /// Add a product from the backend listing by id
    Buy {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
        #[arg(long)]
        variant: Option<String>,
        /// Search term narrowing the listing lookup
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Remove a line
    Remove { id: String },

    /// Set a line's quantity; zero or less removes it
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,

    /// Print the stored cart record as JSON
    Show,

    /// Print subtotal, shipping and total
    Summary,

    /// List products from the backend
    Products {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Register a retailer account
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// Read from STOREFRONT_PASSWORD when omitted
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Place an order for the current cart
    Checkout {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "visa")]
        card: CardType,
    },
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();
    if cli.json_logs {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    let cfg = AppConfig::load_and_validate().context("loading config")?;
    service::runtime::ensure_storage(&cfg.storage).await?;

    let storage = FileKvStorage::new(cfg.storage.cart_path()).await?;
    let api = Arc::new(HttpApiClient::from_config(&cfg.api)?);
    let mut storefront = Storefront::open(&cfg, storage.clone() as Arc<dyn KvStorage>, api).await;
    info!(event = "start", cart_file = %cfg.storage.cart_path().display(), "storefront ready");

    let result = execute(&mut storefront, &cfg, command).await;
    // the store must be closed even on error so queued writes reach disk
    storefront.shutdown().await;
    result
}

async fn execute(storefront: &mut Storefront<HttpApiClient>, cfg: &AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Add { id, name, price, stock, quantity, variant } => {
            let product = ProductDescriptor { selected_variant: variant, ..ProductDescriptor::new(id, name, price, stock) };
            let outcome = storefront.cart_mut().add_to_cart(product, quantity);
            if outcome.clamped() {
                println!("quantity limited to available stock");
            }
            print_cart(storefront);
        }
        Commands::Buy { id, quantity, variant, search } => {
            let listing = storefront.list_products(1, &search).await?;
            let product = listing
                .products
                .iter()
                .find(|p| p.id == id)
                .with_context(|| format!("product {id} not on the first page of the listing"))?;
            add_product_to_cart(storefront.cart_mut(), product, variant.as_deref(), quantity)?;
            print_cart(storefront);
        }
        Commands::Remove { id } => {
            storefront.cart_mut().remove_from_cart(&id);
            print_cart(storefront);
        }
        Commands::Update { id, quantity } => {
            storefront.cart_mut().update_quantity(&id, quantity);
            print_cart(storefront);
        }
        Commands::Clear => {
            storefront.cart_mut().clear_cart();
            print_cart(storefront);
        }
        Commands::Show => {
            let record = storefront.cart().state().to_persisted();
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Summary => {
            let summary = storefront.summary();
            for line in &summary.lines {
                println!("{:<32} {:>4} x {:>10.2} = {:>12.2}", line.name, line.quantity, line.unit_price, line.line_total);
            }
            println!("items     {}", summary.item_count);
            println!("subtotal  {:.2}", summary.subtotal);
            if summary.is_free_shipping() && summary.item_count > 0 {
                println!("shipping  free (over {:.0})", cfg.checkout.free_shipping_over);
            } else {
                println!("shipping  {:.2}", summary.shipping);
            }
            println!("total     {:.2}", summary.total);
        }
        Commands::Products { page, search } => {
            let listing = storefront.list_products(page, &search).await?;
            for p in &listing.products {
                let stock = if p.is_available() { format!("{} in stock", p.stock) } else { "out of stock".into() };
                println!("{:<8} {:<32} {:>10.2}  moq {:<4} {}", p.id, p.name, p.price, p.moq, stock);
            }
            println!("page {} of {}", listing.page, listing.total_pages);
        }
        Commands::Signup { full_name, email, phone, password } => {
            let request = SignUpRequest::retailer(full_name, email, phone, password);
            storefront.sign_up(&request).await?;
            println!("account created for {}; sign in to continue", request.email);
        }
        Commands::Checkout { full_name, street, city, postal_code, country, phone, card } => {
            let draft = CheckoutDraft {
                address: DeliveryAddress { full_name, street, city, postal_code, country, phone },
                card_type: card,
            };
            let receipt = storefront.place_order(&draft).await?;
            println!("order {} placed ({})", receipt.id, receipt.status.as_deref().unwrap_or("pending"));
        }
    }
    Ok(())
}

fn print_cart(storefront: &Storefront<HttpApiClient>) {
    let cart = storefront.cart();
    for line in cart.items() {
        println!("{:<8} {:<32} x{:<4} {:>12.2}", line.id(), line.product.name, line.quantity, line.line_total());
    }
    println!("{} items, {:.2}", cart.total_items(), cart.total_price());
}
