//! Customer details

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Customer details captured by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Customer name
    pub customer_name: String,

    /// Contact phone number
    pub phone: String,

    /// Delivery address
    pub address: String,
}

/// Blank required fields, at most one of each.
pub type MissingFields = SmallVec<[CustomerField; 3]>;

/// A required customer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// Customer name
    Name,

    /// Contact phone number
    Phone,

    /// Delivery address
    Address,
}

impl Display for CustomerField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            CustomerField::Name => "customer name",
            CustomerField::Phone => "phone",
            CustomerField::Address => "address",
        })
    }
}

impl CustomerInfo {
    /// Create customer details.
    pub fn new(
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Fields that are blank (empty or whitespace only), in form order.
    pub fn missing_fields(&self) -> MissingFields {
        [
            (CustomerField::Name, &self.customer_name),
            (CustomerField::Phone, &self.phone),
            (CustomerField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
