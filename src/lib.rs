//! Signature update helper: polls a vendor endpoint for new antivirus
//! signature packages, unpacks them for the scanner, and signals the
//! scanner to reload.
//!
//! The daemon is a single-threaded sequential poll loop. The revision
//! marker file inside the signature directory is the only durable state
//! and is only advanced after a download, unpack, and notify sequence
//! completes in full; any earlier failure leaves it untouched so the
//! next cycle retries the same revision.

#[cfg(feature = "cli")]
pub mod cli_app;
pub mod config;
pub mod core;
#[cfg(feature = "daemon")]
pub mod daemon;
pub mod logger;
pub mod notify;
pub mod updater;
