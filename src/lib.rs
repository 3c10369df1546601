pub mod util {
    /// Returns the number of logical CPU cores available on the system.
    pub fn cpu_core_count() -> usize {
        num_cpus::get()
    }

    /// Default number of serials scanned at once: the core count plus a few
    /// extra slots since tasks mostly wait on the network, capped at 32.
    pub fn default_concurrency() -> usize {
        (cpu_core_count() + 4).min(32)
    }
}

/// The version of the `warranty-scanner` library. This is populated at
/// compile time using the `CARGO_PKG_VERSION` environment variable.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod parse;
pub mod scan;
pub mod serial;

pub use client::{VendorClient, WarrantyApi};
pub use config::Config;
pub use scan::{run_scan, scan_serial, ScanOutcome, Status, Summary};
