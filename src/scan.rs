use std::fmt;
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use tokio::task::JoinError;

use crate::client::WarrantyApi;
use crate::parse::{self, Coverage};

const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Result of scanning a single serial. `Display` gives the line written to the
/// output file.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Active { serial: String, machine_type: String },
    Expired { serial: String, machine_type: String },
    NoWarrantyInfo { serial: String, machine_type: String },
    WarrantyUnavailable { serial: String, machine_type: String },
    TypeExtractionFailed { serial: String },
    InvalidSerial { serial: String },
    TaskFailed { serial: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Expired,
    Other,
}

impl Status {
    pub fn color(self) -> &'static str {
        match self {
            Status::Active => GREEN,
            Status::Expired => YELLOW,
            Status::Other => RED,
        }
    }
}

impl ScanOutcome {
    pub fn status(&self) -> Status {
        match self {
            ScanOutcome::Active { .. } => Status::Active,
            ScanOutcome::Expired { .. } => Status::Expired,
            _ => Status::Other,
        }
    }

    pub fn serial(&self) -> &str {
        match self {
            ScanOutcome::Active { serial, .. }
            | ScanOutcome::Expired { serial, .. }
            | ScanOutcome::NoWarrantyInfo { serial, .. }
            | ScanOutcome::WarrantyUnavailable { serial, .. }
            | ScanOutcome::TypeExtractionFailed { serial }
            | ScanOutcome::InvalidSerial { serial }
            | ScanOutcome::TaskFailed { serial, .. } => serial,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::Active { serial, machine_type } => {
                write!(f, "{serial} : {machine_type} - Warranty Active")
            }
            ScanOutcome::Expired { serial, machine_type } => {
                write!(f, "{serial} : {machine_type} - Warranty Expired")
            }
            ScanOutcome::NoWarrantyInfo { serial, machine_type } => {
                write!(f, "{serial} : {machine_type} - No Warranty Info Available")
            }
            ScanOutcome::WarrantyUnavailable { serial, machine_type } => {
                write!(f, "{serial} : {machine_type} - Failed to retrieve warranty information")
            }
            ScanOutcome::TypeExtractionFailed { serial } => {
                write!(f, "{serial} - Machine type extraction failed")
            }
            ScanOutcome::InvalidSerial { serial } => write!(f, "{serial} - Invalid Serial"),
            ScanOutcome::TaskFailed { serial, reason } => {
                write!(f, "{serial} - Task failed: {reason}")
            }
        }
    }
}

/// Run both lookups for one candidate serial. Every failure along the way is
/// logged and folded into the returned outcome.
pub async fn scan_serial<A: WarrantyApi + ?Sized>(api: &A, candidate: &str) -> ScanOutcome {
    let products = match api.product_lookup(candidate).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to get product data for {candidate}: {e}");
            return ScanOutcome::InvalidSerial { serial: candidate.to_owned() };
        }
    };
    if !parse::is_known_product(&products) {
        return ScanOutcome::InvalidSerial { serial: candidate.to_owned() };
    }

    let serial = parse::product_serial(&products)
        .unwrap_or(candidate)
        .to_owned();
    let machine_type = match parse::machine_type(&products) {
        Ok(machine_type) => machine_type,
        Err(e) => {
            tracing::warn!("Error extracting machine type for {serial}: {e}");
            return ScanOutcome::TypeExtractionFailed { serial };
        }
    };

    let coverage = match api.warranty_lookup(&serial, &machine_type).await {
        Ok(response) => {
            let coverage = parse::coverage(&response);
            if coverage.is_none() {
                tracing::warn!("No usable warranty data for {serial}");
            }
            coverage
        }
        Err(e) => {
            tracing::warn!("Failed to get data for {serial}: {e}");
            None
        }
    };
    match coverage {
        Some(Coverage::Active) => ScanOutcome::Active { serial, machine_type },
        Some(Coverage::Expired) => ScanOutcome::Expired { serial, machine_type },
        Some(Coverage::NoInfo) => ScanOutcome::NoWarrantyInfo { serial, machine_type },
        None => ScanOutcome::WarrantyUnavailable { serial, machine_type },
    }
}

/// Tally of outcomes from one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub active: usize,
    pub expired: usize,
    pub other: usize,
}

impl Summary {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Active => self.active += 1,
            Status::Expired => self.expired += 1,
            Status::Other => self.other += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.active + self.expired + self.other
    }
}

fn task_failure(serial: String, err: JoinError) -> ScanOutcome {
    let reason = if err.is_panic() {
        let payload = err.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked".to_owned())
    } else {
        err.to_string()
    };
    tracing::error!("Serial {serial} generated an exception: {reason}");
    ScanOutcome::TaskFailed { serial, reason }
}

/// Scan every serial with at most `concurrency` lookups in flight. Lines are
/// written to `sink` and echoed to stdout in completion order; each serial
/// produces exactly one line even if its task dies.
pub async fn run_scan<A, W>(
    api: Arc<A>,
    serials: Vec<String>,
    concurrency: usize,
    sink: &mut W,
) -> Result<Summary>
where
    A: WarrantyApi + 'static,
    W: Write,
{
    let mut completions = futures::stream::iter(serials)
        .map(|serial| {
            let api = Arc::clone(&api);
            let handle = tokio::spawn({
                let serial = serial.clone();
                async move { scan_serial(api.as_ref(), &serial).await }
            });
            async move {
                match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => task_failure(serial, e),
                }
            }
        })
        .buffer_unordered(concurrency.max(1));

    let mut summary = Summary::default();
    while let Some(outcome) = completions.next().await {
        writeln!(sink, "{outcome}")?;
        let status = outcome.status();
        println!("{}{outcome}{RESET}", status.color());
        summary.record(status);
    }
    sink.flush()?;
    Ok(summary)
}
