use std::io;

use clap::{Args, Subcommand};
use jiff::Timestamp;
use storefront::{
    invoice::{InvoiceSource, derive_invoice},
    orders::OrderId,
};
use storefront_app::context::AppContext;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::money;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List confirmed orders
    List,
    /// Print the invoice of a confirmed order
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Order id, e.g. FCT-00042
    id: OrderId,
}

pub(crate) async fn run(context: &AppContext, command: OrdersCommand) -> Result<(), String> {
    let history = context
        .orders
        .history()
        .await
        .map_err(|error| format!("failed to load orders: {error}"))?;

    match command.command {
        OrdersSubcommand::List => {
            if history.is_empty() {
                println!("no orders found");
                return Ok(());
            }

            let mut builder = Builder::default();

            builder.push_record(["Order", "Date", "Customer", "Lines", "Total"]);

            for order in &history {
                builder.push_record([
                    order.id().to_string(),
                    order.date().to_string(),
                    order.customer().customer_name.clone(),
                    order.items().len().to_string(),
                    money(order.total(), context.currency),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Columns::new(3..5), Alignment::right());

            println!("{table}");

            Ok(())
        }
        OrdersSubcommand::Show(args) => {
            let order = history
                .iter()
                .find(|order| *order.id() == args.id)
                .ok_or_else(|| format!("order {} not found", args.id))?;

            derive_invoice(InvoiceSource::Confirmed(order), Timestamp::now())
                .write_to(io::stdout().lock(), context.currency)
                .map_err(|error| format!("failed to print invoice: {error}"))
        }
    }
}
