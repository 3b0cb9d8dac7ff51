use std::io;

use clap::Args;
use jiff::Timestamp;
use reqwest::Url;
use storefront::{
    customer::CustomerInfo,
    invoice::{InvoiceSource, derive_invoice},
};
use storefront_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer phone number
    #[arg(long)]
    phone: String,

    /// Delivery address
    #[arg(long)]
    address: String,
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let mut session = context.cart_session();
    let mut checkout = context.checkout();

    checkout
        .set_customer(CustomerInfo::new(args.name, args.phone, args.address))
        .map_err(|error| error.to_string())?;

    let submission = checkout
        .submit(&mut session)
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    let invoice = derive_invoice(InvoiceSource::Confirmed(&submission.order), Timestamp::now());

    invoice
        .write_to(io::stdout().lock(), context.currency)
        .map_err(|error| format!("failed to print invoice: {error}"))?;

    let message = invoice
        .share_message(context.currency)
        .map_err(|error| format!("failed to build share message: {error}"))?;

    let share_url = Url::parse_with_params("https://wa.me/", [("text", message.as_str())])
        .map_err(|error| format!("failed to build share link: {error}"))?;

    println!("order_id: {}", submission.order.id());
    println!("share: {share_url}");

    // Delivery runs detached; wait so the process does not exit first
    if let Some(notification) = submission.notification
        && let Err(error) = notification.await
    {
        eprintln!("order notification did not complete: {error}");
    }

    Ok(())
}
