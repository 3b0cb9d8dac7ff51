use std::io;

use clap::Args;
use jiff::Timestamp;
use storefront::{
    customer::CustomerInfo,
    invoice::{InvoiceSource, derive_invoice},
};
use storefront_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct InvoiceArgs {
    /// Customer name
    #[arg(long, default_value = "")]
    name: String,

    /// Customer phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Delivery address
    #[arg(long, default_value = "")]
    address: String,
}

pub(crate) fn run(context: &AppContext, args: InvoiceArgs) -> Result<(), String> {
    let session = context.cart_session();
    let customer = CustomerInfo::new(args.name, args.phone, args.address);

    let invoice = derive_invoice(
        InvoiceSource::Draft {
            cart: session.cart(),
            customer: &customer,
        },
        Timestamp::now(),
    );

    invoice
        .write_to(io::stdout().lock(), context.currency)
        .map_err(|error| format!("failed to print invoice: {error}"))
}
