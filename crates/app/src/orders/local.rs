//! Local order ledger.

use async_trait::async_trait;
use jiff::Timestamp;
use serde_json::Value;
use storefront::orders::{
    ConfirmedOrder, OrderDetails, OrderId, OrderIdFormat, OrderSequence, SinkOutcome,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    orders::{OrderSink, OrderSinkError},
    storage::{JsonFile, StoreError},
};

/// Order sink that confirms every order and appends it to a JSON ledger file.
///
/// The ledger is the record of every order ever confirmed, so it is never discarded:
/// entries that cannot be read are left in place and skipped in the history, and an
/// unreadable ledger refuses new orders instead of being replaced.
///
/// Ids continue from the ledger: the sequence starts after the highest id recorded,
/// malformed entries included, or the number of entries, if larger.
#[derive(Debug)]
pub struct LocalOrderSink {
    ledger: JsonFile<Vec<Value>>,
    sequence: Mutex<OrderSequence>,
}

impl LocalOrderSink {
    /// Open the ledger and seed the id sequence from it.
    pub fn open(ledger: JsonFile<Vec<Value>>, format: OrderIdFormat) -> Self {
        let entries = match ledger.read() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(error) => {
                warn!("order ledger is unreadable: {error}");
                Vec::new()
            }
        };

        let sequence = OrderSequence::seeded(format, recorded_sequence(&entries));

        Self {
            ledger,
            sequence: Mutex::new(sequence),
        }
    }

    /// Sequence number of the most recently issued id.
    pub async fn last_sequence(&self) -> u64 {
        self.sequence.lock().await.last()
    }

    fn entries(&self) -> Result<Vec<Value>, StoreError> {
        Ok(self.ledger.read()?.unwrap_or_default())
    }
}

#[async_trait]
impl OrderSink for LocalOrderSink {
    async fn submit(&self, details: OrderDetails) -> Result<SinkOutcome, OrderSinkError> {
        let mut sequence = self.sequence.lock().await;
        let mut entries = self.entries()?;

        let mut next = sequence.clone();
        let recorded = recorded_sequence(&entries);

        if recorded > next.last() {
            next.reset(recorded);
        }

        let order = ConfirmedOrder::new(next.next_id(), Timestamp::now(), details);

        entries.push(serde_json::to_value(&order).map_err(StoreError::from)?);
        self.ledger.save(&entries)?;

        *sequence = next;

        info!(order = %order.id(), total = %order.total(), "order recorded in local ledger");

        Ok(SinkOutcome::Confirmed(order))
    }

    async fn history(&self) -> Result<Vec<ConfirmedOrder>, OrderSinkError> {
        Ok(self
            .entries()?
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(order) => Some(order),
                Err(source) => {
                    warn!("skipping malformed order in ledger: {source}");
                    None
                }
            })
            .collect())
    }
}

/// Last sequence number used by `entries`: the larger of the entry count and the
/// highest id that still parses, whether or not the rest of its entry does.
fn recorded_sequence(entries: &[Value]) -> u64 {
    let highest = entries
        .iter()
        .filter_map(|entry| entry.get("id")?.as_str()?.parse::<OrderId>().ok())
        .map(|id| id.sequence())
        .max()
        .unwrap_or(0);

    highest.max(u64::try_from(entries.len()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::dec;
    use storefront::{
        cart::Cart,
        customer::CustomerInfo,
        products::{Product, ProductId},
    };
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn details() -> OrderDetails {
        let mut cart = Cart::new();

        cart.add(
            &Product {
                id: ProductId::new(1),
                name: "Oil Filter".to_string(),
                price: dec!(50),
                image: String::new(),
                category: "Filters".to_string(),
                pieces_per_carton: None,
                sku: None,
            },
            2,
        );

        OrderDetails::new(CustomerInfo::new("Ahmed", "0101234567", "123 Nasr St"), &cart)
    }

    fn confirmed_id(outcome: &SinkOutcome) -> Option<String> {
        outcome.confirmed().map(|order| order.id().to_string())
    }

    #[tokio::test]
    async fn ids_follow_the_ledger() -> TestResult {
        let dir = TempDir::new()?;
        let ledger = JsonFile::new(dir.path().join("orders.json"));

        let sink = LocalOrderSink::open(ledger.clone(), OrderIdFormat::default());

        let first = sink.submit(details()).await?;
        let second = sink.submit(details()).await?;

        assert_eq!(confirmed_id(&first).as_deref(), Some("FCT-00001"));
        assert_eq!(confirmed_id(&second).as_deref(), Some("FCT-00002"));

        let reopened = LocalOrderSink::open(ledger, OrderIdFormat::default());
        let third = reopened.submit(details()).await?;

        assert_eq!(confirmed_id(&third).as_deref(), Some("FCT-00003"));
        assert_eq!(reopened.history().await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_lines_get_placeholder_skus() -> TestResult {
        let dir = TempDir::new()?;
        let sink = LocalOrderSink::open(
            JsonFile::new(dir.path().join("orders.json")),
            OrderIdFormat::default(),
        );

        let outcome = sink.submit(details()).await?;

        let sku = outcome
            .confirmed()
            .and_then(|order| order.items().first())
            .and_then(|item| item.product().sku.clone());

        assert_eq!(sku.as_deref(), Some("not available"));

        Ok(())
    }

    #[tokio::test]
    async fn malformed_entries_are_kept_and_never_reissued() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("orders.json");

        fs::write(
            &path,
            r#"[
                {"id": "FCT-00007", "date": "2024-03-01T10:00:00Z", "customerName": "Ahmed",
                 "phone": "0101234567", "address": "123 Nasr St", "items": [], "total": 0},
                {"id": "FCT-00008", "date": "not-a-date", "customerName": "Mona"}
            ]"#,
        )?;

        let sink = LocalOrderSink::open(JsonFile::new(&path), OrderIdFormat::default());

        assert_eq!(sink.last_sequence().await, 8);

        let history = sink.history().await?;
        let ids: Vec<_> = history.iter().map(|order| order.id().to_string()).collect();

        assert_eq!(ids, vec!["FCT-00007"]);

        let outcome = sink.submit(details()).await?;

        assert_eq!(confirmed_id(&outcome).as_deref(), Some("FCT-00009"));

        let raw = fs::read_to_string(&path)?;

        assert!(raw.contains("not-a-date"), "malformed entry should stay in the ledger");
        assert_eq!(sink.history().await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_ledger_refuses_orders() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("orders.json");

        fs::write(&path, "[{\"id\": \"FCT-00003\"")?;

        let sink = LocalOrderSink::open(JsonFile::new(&path), OrderIdFormat::default());

        let result = sink.submit(details()).await;

        assert!(matches!(
            result,
            Err(OrderSinkError::Store(StoreError::Corrupt { .. }))
        ));
        assert!(matches!(sink.history().await, Err(OrderSinkError::Store(_))));
        assert_eq!(fs::read_to_string(&path)?, "[{\"id\": \"FCT-00003\"");

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_does_not_consume_an_id() -> TestResult {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("blocker");

        fs::write(&blocker, "")?;

        let sink = LocalOrderSink::open(
            JsonFile::new(blocker.join("orders.json")),
            OrderIdFormat::default(),
        );

        let result = sink.submit(details()).await;

        assert!(matches!(result, Err(OrderSinkError::Store(_))));
        assert_eq!(sink.last_sequence().await, 0);

        Ok(())
    }
}
