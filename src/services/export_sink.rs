//! Trait for remote destinations of the exported tables.

use std::path::Path;

use anyhow::Result;

/// A remote copy of the local artifacts (a hosted spreadsheet, an object
/// store). Local files are always complete before any sink runs.
#[async_trait::async_trait]
pub trait ExportSink: Send + Sync {
    /// Short label used in logs.
    fn label(&self) -> &str;

    /// Publishes the delimited file at `path` under the remote name `name`.
    async fn publish(&self, name: &str, path: &Path) -> Result<()>;
}
