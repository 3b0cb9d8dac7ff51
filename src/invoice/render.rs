//! Invoice rendering

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use super::InvoicePayload;

const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur when rendering an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoices with no lines are not rendered.
    #[error("the cart is empty")]
    Empty,

    /// Share messages are only produced for confirmed orders.
    #[error("the invoice has no confirmed order id")]
    Unconfirmed,

    /// IO error
    #[error("IO error")]
    IO,
}

impl InvoicePayload {
    /// Print the invoice as a plain-text document.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Empty`] when the invoice has no lines, or
    /// [`InvoiceError::IO`] if writing fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        currency: &'static Currency,
    ) -> Result<(), InvoiceError> {
        if self.is_empty() {
            return Err(InvoiceError::Empty);
        }

        write_heading(&mut out, self)?;
        write_customer(&mut out, self)?;
        write_lines(&mut out, self, currency)?;

        writeln!(out, " Total: {}\n", money(self.total, currency)).map_err(|_err| InvoiceError::IO)
    }

    /// Short text summary suitable for sharing through a messaging app.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Unconfirmed`] for drafts and [`InvoiceError::Empty`] for
    /// invoices without lines.
    pub fn share_message(&self, currency: &'static Currency) -> Result<String, InvoiceError> {
        let Some(id) = &self.id else {
            return Err(InvoiceError::Unconfirmed);
        };

        if self.is_empty() {
            return Err(InvoiceError::Empty);
        }

        let items = self
            .items
            .iter()
            .map(|line| format!("- {} (x{})", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "*Invoice: {id}*\n\n*Customer:* {}\n*Phone:* {}\n\n*Items:*\n{items}\n\n*Total: {}*\n\nThank you for your order!",
            self.customer.customer_name,
            self.customer.phone,
            money(self.total, currency),
        ))
    }
}

fn write_heading(out: &mut impl io::Write, invoice: &InvoicePayload) -> Result<(), InvoiceError> {
    let id = invoice
        .id
        .as_ref()
        .map_or_else(|| "unconfirmed".to_string(), ToString::to_string);

    writeln!(out, "\n Invoice {id}\n Date: {}", invoice.date).map_err(|_err| InvoiceError::IO)
}

fn write_customer(out: &mut impl io::Write, invoice: &InvoicePayload) -> Result<(), InvoiceError> {
    let customer = &invoice.customer;

    writeln!(
        out,
        "\n Customer: {}\n Phone:    {}\n Address:  {}",
        or_not_available(&customer.customer_name),
        or_not_available(&customer.phone),
        or_not_available(&customer.address),
    )
    .map_err(|_err| InvoiceError::IO)
}

fn write_lines(
    out: &mut impl io::Write,
    invoice: &InvoicePayload,
    currency: &'static Currency,
) -> Result<(), InvoiceError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "SKU", "Qty", "Unit Price", "Subtotal"]);

    for (idx, line) in invoice.items.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.name.clone(),
            line.sku.as_deref().map_or(NOT_AVAILABLE, or_not_available).to_string(),
            line.quantity.to_string(),
            money(line.price, currency).to_string(),
            money(line.subtotal, currency).to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| InvoiceError::IO)
}

fn money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_decimal(amount, currency)
}

fn or_not_available(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}
