use clap::Args;
use storefront::filter::{CategoryFilter, ProductFilter, categories as category_choices};
use storefront_app::context::AppContext;
use tabled::{builder::Builder, settings::Style};

use super::money;

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Case-insensitive substring of the product name
    #[arg(long, default_value = "")]
    search: String,

    /// Only list products in this category
    #[arg(long)]
    category: Option<String>,
}

pub(crate) async fn list(context: &AppContext, args: CatalogArgs) -> Result<(), String> {
    let catalog = context.catalog.products().await;
    let filter = ProductFilter::new(&args.search, CategoryFilter::from(args.category));
    let products = filter.apply(&catalog);

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "SKU", "Price"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            product.sku.clone().unwrap_or_default(),
            money(product.price, context.currency),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}

pub(crate) async fn categories(context: &AppContext) -> Result<(), String> {
    let catalog = context.catalog.products().await;

    for choice in category_choices(&catalog) {
        println!("{choice}");
    }

    Ok(())
}

pub(crate) async fn promo(context: &AppContext) -> Result<(), String> {
    let image = match &context.promo {
        Some(promo) => promo.promo_image().await,
        None => None,
    };

    match image {
        Some(url) => println!("{url}"),
        None => println!("no promotion"),
    }

    Ok(())
}
