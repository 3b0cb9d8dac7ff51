//! Order confirmation state machine
//!
//! `Building` -> `Submitting` -> `Confirmed`. A failed submission returns to
//! `Building` with the error recorded and the cart untouched.
//!
//! The machine performs no I/O: [`Checkout::begin`] yields the [`OrderDetails`] to
//! hand to an order sink, and the sink's answer is fed back through
//! [`Checkout::confirm`] or [`Checkout::fail`].

use thiserror::Error;

use crate::{
    cart::Cart,
    customer::{CustomerField, CustomerInfo, MissingFields},
    orders::{ConfirmedOrder, OrderDetails, OrderId},
};

/// Errors that can occur while driving a checkout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// One or more customer fields are blank.
    #[error("missing customer details: {}", join_fields(.0))]
    MissingCustomerDetails(MissingFields),

    /// Orders cannot be submitted with an empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// A submission is already in flight.
    #[error("an order submission is already in progress")]
    AlreadySubmitting,

    /// This checkout already produced an order.
    #[error("order {0} is already confirmed")]
    AlreadyConfirmed(OrderId),

    /// A sink answer arrived with no submission in flight.
    #[error("no order submission is in progress")]
    NotSubmitting,
}

fn join_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checkout progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    /// Customer details are being entered.
    #[default]
    Building,

    /// The order is with the order sink.
    Submitting,

    /// The order sink accepted the order.
    Confirmed(ConfirmedOrder),
}

/// One customer's path from cart to confirmed order.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    customer: CustomerInfo,
    state: CheckoutState,
    last_error: Option<String>,
}

impl Checkout {
    /// Start a checkout with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a checkout with the form filled in.
    pub fn with_customer(customer: CustomerInfo) -> Self {
        Self {
            customer,
            ..Self::default()
        }
    }

    /// Current state
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Customer form contents
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Message from the most recent failed submission, cleared on the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting)
    }

    /// The confirmed order, once there is one.
    pub fn confirmed_order(&self) -> Option<&ConfirmedOrder> {
        match &self.state {
            CheckoutState::Confirmed(order) => Some(order),
            CheckoutState::Building | CheckoutState::Submitting => None,
        }
    }

    /// Replace the form contents.
    ///
    /// # Errors
    ///
    /// Fails unless the checkout is in `Building`.
    pub fn set_customer(&mut self, customer: CustomerInfo) -> Result<(), CheckoutError> {
        self.ensure_building()?;
        self.customer = customer;

        Ok(())
    }

    /// Move to `Submitting` and return the order to send to the sink.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadySubmitting`] / [`CheckoutError::AlreadyConfirmed`]: wrong state.
    /// - [`CheckoutError::MissingCustomerDetails`]: a customer field is blank.
    /// - [`CheckoutError::EmptyCart`]: `cart` has no lines.
    ///
    /// The state is unchanged on error.
    pub fn begin(&mut self, cart: &Cart) -> Result<OrderDetails, CheckoutError> {
        self.ensure_building()?;

        let missing = self.customer.missing_fields();

        if !missing.is_empty() {
            return Err(CheckoutError::MissingCustomerDetails(missing));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Submitting;
        self.last_error = None;

        Ok(OrderDetails::new(self.customer.clone(), cart))
    }

    /// Record the sink's confirmation and empty `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] when no submission is in flight; the
    /// cart is left untouched.
    pub fn confirm(
        &mut self,
        cart: &mut Cart,
        order: ConfirmedOrder,
    ) -> Result<&ConfirmedOrder, CheckoutError> {
        if !self.is_submitting() {
            return Err(CheckoutError::NotSubmitting);
        }

        cart.clear();
        self.state = CheckoutState::Confirmed(order);

        self.confirmed_order().ok_or(CheckoutError::NotSubmitting)
    }

    /// Record a failed submission and return to `Building`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] when no submission is in flight.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CheckoutError> {
        if !self.is_submitting() {
            return Err(CheckoutError::NotSubmitting);
        }

        self.state = CheckoutState::Building;
        self.last_error = Some(message.into());

        Ok(())
    }

    /// Start over with an empty form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadySubmitting`] while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), CheckoutError> {
        if self.is_submitting() {
            return Err(CheckoutError::AlreadySubmitting);
        }

        *self = Self::new();

        Ok(())
    }

    fn ensure_building(&self) -> Result<(), CheckoutError> {
        match &self.state {
            CheckoutState::Building => Ok(()),
            CheckoutState::Submitting => Err(CheckoutError::AlreadySubmitting),
            CheckoutState::Confirmed(order) => {
                Err(CheckoutError::AlreadyConfirmed(order.id().clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::dec;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        orders::{OrderIdFormat, OrderSequence},
        products::{Product, ProductId},
    };

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();

        for (id, price, quantity) in [(1, dec!(50), 2), (2, dec!(80), 1)] {
            cart.add(
                &Product {
                    id: ProductId::new(id),
                    name: format!("Part {id}"),
                    price,
                    image: String::new(),
                    category: "Parts".to_string(),
                    pieces_per_carton: None,
                    sku: None,
                },
                quantity,
            );
        }

        cart
    }

    fn customer() -> CustomerInfo {
        CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St")
    }

    fn confirmed(details: OrderDetails, sequence: &mut OrderSequence) -> ConfirmedOrder {
        ConfirmedOrder::new(sequence.next_id(), Timestamp::UNIX_EPOCH, details)
    }

    #[test]
    fn begin_requires_customer_details() {
        let mut checkout = Checkout::with_customer(CustomerInfo::new("Ahmed", "", ""));

        let result = checkout.begin(&cart());

        assert_eq!(
            result,
            Err(CheckoutError::MissingCustomerDetails(smallvec![
                CustomerField::Phone,
                CustomerField::Address
            ]))
        );
        assert_eq!(checkout.state(), &CheckoutState::Building);
    }

    #[test]
    fn begin_requires_items() {
        let mut checkout = Checkout::with_customer(customer());

        assert_eq!(checkout.begin(&Cart::new()), Err(CheckoutError::EmptyCart));
        assert_eq!(checkout.state(), &CheckoutState::Building);
    }

    #[test]
    fn begin_snapshots_order() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());

        let details = checkout.begin(&cart())?;

        assert!(checkout.is_submitting());
        assert_eq!(details.customer, customer());
        assert_eq!(details.total, dec!(180));

        Ok(())
    }

    #[test]
    fn duplicate_begin_is_rejected() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let cart = cart();

        checkout.begin(&cart)?;

        assert_eq!(checkout.begin(&cart), Err(CheckoutError::AlreadySubmitting));
        assert!(checkout.is_submitting());

        Ok(())
    }

    #[test]
    fn confirm_clears_cart() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let mut cart = cart();
        let mut sequence = OrderSequence::seeded(OrderIdFormat::default(), 2);

        let details = checkout.begin(&cart)?;
        let order = checkout.confirm(&mut cart, confirmed(details, &mut sequence))?;

        assert_eq!(order.id().to_string(), "FCT-00003");
        assert_eq!(order.total(), dec!(180));
        assert!(cart.is_empty());
        assert!(checkout.confirmed_order().is_some());

        Ok(())
    }

    #[test]
    fn confirm_without_submission_leaves_cart() {
        let mut checkout = Checkout::with_customer(customer());
        let mut cart = cart();
        let mut sequence = OrderSequence::new(OrderIdFormat::default());
        let order = confirmed(OrderDetails::new(customer(), &cart), &mut sequence);

        assert_eq!(
            checkout.confirm(&mut cart, order).map(|_| ()),
            Err(CheckoutError::NotSubmitting)
        );
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn fail_returns_to_building_with_cart_intact() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let cart = cart();
        let before = cart.clone();

        checkout.begin(&cart)?;
        checkout.fail("sink unavailable")?;

        assert_eq!(checkout.state(), &CheckoutState::Building);
        assert_eq!(checkout.last_error(), Some("sink unavailable"));
        assert_eq!(checkout.customer(), &customer());
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn retry_after_failure_clears_error() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let cart = cart();

        checkout.begin(&cart)?;
        checkout.fail("timeout")?;
        checkout.begin(&cart)?;

        assert!(checkout.is_submitting());
        assert_eq!(checkout.last_error(), None);

        Ok(())
    }

    #[test]
    fn confirmed_checkout_rejects_edits_and_resubmission() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let mut cart = cart();
        let mut sequence = OrderSequence::new(OrderIdFormat::default());

        let details = checkout.begin(&cart)?;
        checkout.confirm(&mut cart, confirmed(details, &mut sequence))?;

        let id: OrderId = "FCT-00001".parse()?;

        assert_eq!(
            checkout.set_customer(CustomerInfo::default()),
            Err(CheckoutError::AlreadyConfirmed(id.clone()))
        );
        assert_eq!(checkout.begin(&cart), Err(CheckoutError::AlreadyConfirmed(id)));

        Ok(())
    }

    #[test]
    fn reset_starts_a_new_order() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());
        let mut cart = cart();
        let mut sequence = OrderSequence::new(OrderIdFormat::default());

        let details = checkout.begin(&cart)?;
        checkout.confirm(&mut cart, confirmed(details, &mut sequence))?;
        checkout.reset()?;

        assert_eq!(checkout.state(), &CheckoutState::Building);
        assert_eq!(checkout.customer(), &CustomerInfo::default());

        Ok(())
    }

    #[test]
    fn reset_is_refused_while_submitting() -> TestResult {
        let mut checkout = Checkout::with_customer(customer());

        checkout.begin(&cart())?;

        assert_eq!(checkout.reset(), Err(CheckoutError::AlreadySubmitting));

        Ok(())
    }

    #[test]
    fn missing_details_message_lists_fields() {
        let error = CheckoutError::MissingCustomerDetails(smallvec![
            CustomerField::Name,
            CustomerField::Phone,
        ]);

        assert_eq!(error.to_string(), "missing customer details: customer name, phone");
    }
}
