#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use warranty_scanner::error::LookupError;
use warranty_scanner::WarrantyApi;

/// How a fake serial should answer.
#[derive(Clone)]
pub enum Canned {
    Products(Value),
    ProductFailure(u16),
    Warranty { products: Value, warranty: Value },
    WarrantyFailure { products: Value, status: u16 },
    Panic,
}

pub fn product(serial: &str, name: &str) -> Value {
    json!([{ "Id": format!("LAPTOPS/THINKPAD/{serial}"), "Serial": serial, "Name": name }])
}

pub fn warranty(remaining_days: i64) -> Value {
    json!({ "data": { "baseWarranties": [{ "remainingDays": remaining_days }] } })
}

/// In-memory stand-in for the vendor endpoints. Unknown serials get an empty
/// product list.
#[derive(Default)]
pub struct FakeApi {
    answers: HashMap<String, Canned>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, serial: &str, canned: Canned) -> Self {
        self.answers.insert(serial.to_owned(), canned);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Highest number of product lookups observed running at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn products_for(&self, serial: &str) -> Option<&Canned> {
        self.answers.get(serial).or_else(|| {
            self.answers.values().find(|canned| match canned {
                Canned::Warranty { products, .. } | Canned::WarrantyFailure { products, .. } => {
                    products[0]["Serial"] == serial
                }
                _ => false,
            })
        })
    }
}

#[async_trait]
impl WarrantyApi for FakeApi {
    async fn product_lookup(&self, serial: &str) -> Result<Value, LookupError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.answers.get(serial) {
            None => Ok(json!([])),
            Some(Canned::Products(products)) => Ok(products.clone()),
            Some(Canned::ProductFailure(status)) => Err(LookupError::Status(*status)),
            Some(Canned::Warranty { products, .. })
            | Some(Canned::WarrantyFailure { products, .. }) => Ok(products.clone()),
            Some(Canned::Panic) => panic!("lookup exploded for {serial}"),
        }
    }

    async fn warranty_lookup(
        &self,
        serial: &str,
        _machine_type: &str,
    ) -> Result<Value, LookupError> {
        match self.products_for(serial) {
            Some(Canned::Warranty { warranty, .. }) => Ok(warranty.clone()),
            Some(Canned::WarrantyFailure { status, .. }) => Err(LookupError::Status(*status)),
            _ => Ok(json!({ "data": null })),
        }
    }
}
