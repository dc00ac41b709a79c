//! Hosted spreadsheet import.
//!
//! [`SheetsCredentials`] reads the OAuth client settings from the environment.
//! [`SheetsClient`] exchanges them for an access token and implements
//! [`ExportSink`](crate::services::export_sink::ExportSink) by importing CSV
//! content into an existing spreadsheet with the same name.

mod client;
mod config;

pub use client::SheetsClient;
pub use config::SheetsCredentials;
