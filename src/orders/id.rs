//! Order identifiers

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use thiserror::Error;

use super::ConfirmedOrder;

/// Errors that can occur while parsing an order id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderIdError {
    /// The id does not end in a sequence number.
    #[error("order id {0:?} has no sequence number")]
    MissingSequence(String),

    /// The sequence number does not fit in 64 bits.
    #[error("order id {0:?} has an out of range sequence number")]
    SequenceOutOfRange(String),
}

/// Prefix and zero-padded width used to render order ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIdFormat {
    prefix: String,
    width: usize,
}

impl OrderIdFormat {
    /// Create a format. The prefix is used verbatim, separator included.
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// Render sequence number `sequence` in this format.
    pub fn id(&self, sequence: u64) -> OrderId {
        OrderId {
            prefix: self.prefix.clone(),
            sequence,
            width: self.width,
        }
    }
}

impl Default for OrderIdFormat {
    fn default() -> Self {
        Self::new("FCT-", 5)
    }
}

/// Sequential order identifier such as `FCT-00042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId {
    prefix: String,
    sequence: u64,
    width: usize,
}

impl OrderId {
    /// Position of this order in the sequence.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Prefix preceding the sequence number.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{:0width$}", self.prefix, self.sequence, width = self.width)
    }
}

impl FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let prefix = raw.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = raw.strip_prefix(prefix).unwrap_or_default();

        if digits.is_empty() {
            return Err(OrderIdError::MissingSequence(raw.to_string()));
        }

        let sequence = digits
            .parse()
            .map_err(|_err| OrderIdError::SequenceOutOfRange(raw.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            sequence,
            width: digits.len(),
        })
    }
}

impl Serialize for OrderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(D::Error::custom)
    }
}

/// Generator for strictly increasing order ids.
///
/// The sequence holds the last number handed out; the next id is one higher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSequence {
    format: OrderIdFormat,
    last: u64,
}

impl OrderSequence {
    /// Start a sequence whose first id is number 1.
    pub fn new(format: OrderIdFormat) -> Self {
        Self::seeded(format, 0)
    }

    /// Start a sequence after `last`.
    pub fn seeded(format: OrderIdFormat, last: u64) -> Self {
        Self { format, last }
    }

    /// Start a sequence after every order in `history`.
    ///
    /// The seed is the larger of the history length and the highest sequence number
    /// found, so a history with gaps never causes an id to be reissued.
    pub fn after_history<'a>(
        format: OrderIdFormat,
        history: impl IntoIterator<Item = &'a ConfirmedOrder>,
    ) -> Self {
        let (count, highest) = history
            .into_iter()
            .fold((0_u64, 0_u64), |(count, highest), order| {
                (count.saturating_add(1), highest.max(order.id().sequence()))
            });

        Self::seeded(format, count.max(highest))
    }

    /// Last number handed out, zero if none.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Format used for new ids.
    pub fn format(&self) -> &OrderIdFormat {
        &self.format
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> OrderId {
        self.last = self.last.saturating_add(1);

        self.format.id(self.last)
    }

    /// Rewind or fast-forward so the next id follows `last`.
    pub fn reset(&mut self, last: u64) {
        self.last = last;
    }
}
