use clap::{Args, Subcommand};
use storefront::{cart::Cart, products::ProductId};
use storefront_app::context::AppContext;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::money;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add a catalog product to the cart
    Add(AddArgs),
    /// Set the quantity of a cart line; zero or less removes it
    Update(UpdateArgs),
    /// Remove a cart line
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Catalog product id
    id: u64,

    /// Units to add
    #[arg(long, short, default_value_t = 1)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Catalog product id
    id: u64,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Catalog product id
    id: u64,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let mut session = context.cart_session();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let id = ProductId::new(args.id);
            let catalog = context.catalog.products().await;

            let product = catalog
                .iter()
                .find(|product| product.id == id)
                .ok_or_else(|| format!("product {id} is not in the catalog"))?;

            session.add(product, args.quantity);
        }
        CartSubcommand::Update(args) => session.update_quantity(ProductId::new(args.id), args.quantity),
        CartSubcommand::Remove(args) => session.remove(ProductId::new(args.id)),
        CartSubcommand::Clear => session.clear(),
    }

    print_cart(session.cart(), context);

    Ok(())
}

fn print_cart(cart: &Cart, context: &AppContext) {
    if cart.is_empty() {
        println!("the cart is empty");
        return;
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Qty", "Unit Price", "Subtotal"]);

    for item in cart.items() {
        builder.push_record([
            item.id().to_string(),
            item.product().name.clone(),
            item.quantity().to_string(),
            money(item.price(), context.currency),
            money(item.subtotal(), context.currency),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    println!("{table}");
    println!(
        " {} units, total {}",
        cart.unit_count(),
        money(cart.total(), context.currency)
    );
}
