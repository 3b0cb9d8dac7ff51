use clap::{Parser, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use storefront_app::{config::AppConfig, context::AppContext, observability};

mod access;
mod cart;
mod catalog;
mod checkout;
mod invoice;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Unlock the storefront with the access password
    Login(access::LoginArgs),
    /// Discard the stored access grant
    Logout,
    /// List catalog products
    Catalog(catalog::CatalogArgs),
    /// List catalog categories
    Categories,
    /// Print the storefront banner image URL
    Promo,
    /// Inspect and edit the cart
    Cart(cart::CartCommand),
    /// Print a draft invoice for the cart
    Invoice(invoice::InvoiceArgs),
    /// Submit the cart as an order
    Checkout(checkout::CheckoutArgs),
    /// Browse confirmed orders
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start storefront: {error}"))?;

        if self.command.requires_access() && !context.access.is_authorized(Timestamp::now()) {
            return Err("access required: run `storefront login` first".to_string());
        }

        match self.command {
            Commands::Login(args) => access::login(&context, args).await,
            Commands::Logout => access::logout(&context),
            Commands::Catalog(args) => catalog::list(&context, args).await,
            Commands::Categories => catalog::categories(&context).await,
            Commands::Promo => catalog::promo(&context).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Invoice(args) => invoice::run(&context, args),
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Orders(command) => orders::run(&context, command).await,
        }
    }
}

impl Commands {
    fn requires_access(&self) -> bool {
        !matches!(self, Commands::Login(_) | Commands::Logout)
    }
}

fn money(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}
