//! Destination for finished reports.
//!
//! Persistence is a collaborator concern: the crate produces JSON values
//! and hands them to whatever sink the host application provides. No file
//! or network sink ships with the crate.

use std::path::{Path, PathBuf};

/// Accepts one serialized report for a destination path.
///
/// Resolves to the path the report was written to, or fails with the
/// underlying I/O error. No retries are performed by the caller.
pub trait ReportSink {
    fn write(
        &self,
        report: &serde_json::Value,
        destination: &Path,
    ) -> impl Future<Output = std::io::Result<PathBuf>> + Send;
}
