//! Screenshot captures and their asynchronous resolution.
//!
//! Steps reference screenshots before the files exist: a capture is a
//! future that eventually resolves to the on-disk screenshot. The report
//! serializer awaits every capture attached to a step before emitting the
//! step's JSON object.

use chrono::{DateTime, Utc};
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A screenshot that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    /// Path to the image file
    pub path: PathBuf,

    /// Timestamp when the screenshot was created
    #[serde(with = "chrono::serde::ts_seconds")]
    pub captured_at: DateTime<Utc>,
}

impl Screenshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            captured_at: Utc::now(),
        }
    }

    /// Base name of the image file, independent of where it was saved
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result type for capture resolution
pub type CaptureResult = Result<Screenshot, CaptureError>;

/// Error types for screenshot capture
#[derive(Debug)]
pub enum CaptureError {
    /// The capture process itself failed
    Failed(String),

    /// I/O error while producing the image
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Failed(msg) => write!(f, "Capture failed: {}", msg),
            CaptureError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Failed(_) => None,
            CaptureError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}

/// A pending screenshot capture.
///
/// Resolves exactly once; there is no cancellation path, so a capture
/// that never resolves stalls any report node waiting on it.
pub struct ScreenshotCapture {
    inner: BoxFuture<'static, CaptureResult>,
}

impl ScreenshotCapture {
    /// A capture that has already resolved
    pub fn ready(screenshot: Screenshot) -> Self {
        Self {
            inner: Box::pin(future::ready(Ok(screenshot))),
        }
    }

    /// A capture that has already failed
    pub fn failed(err: CaptureError) -> Self {
        Self {
            inner: Box::pin(future::ready(Err(err))),
        }
    }

    /// Wrap an in-flight capture
    pub fn from_future<F>(fut: F) -> Self
    where
        F: Future<Output = CaptureResult> + Send + 'static,
    {
        Self {
            inner: Box::pin(fut),
        }
    }
}

impl Future for ScreenshotCapture {
    type Output = CaptureResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for ScreenshotCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScreenshotCapture(..)")
    }
}

/// Convenience constructor for a capture resolved from a known path
pub fn capture_at(path: impl AsRef<Path>) -> ScreenshotCapture {
    ScreenshotCapture::ready(Screenshot::new(path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_directory_independent() {
        let shot = Screenshot::new("/var/tmp/run_1/step_3.png");
        assert_eq!(shot.file_name(), "step_3.png");
    }

    #[test]
    fn test_file_name_of_bare_path() {
        let shot = Screenshot::new("capture.png");
        assert_eq!(shot.file_name(), "capture.png");
    }

    #[tokio::test]
    async fn test_ready_capture_resolves() {
        let shot = ScreenshotCapture::ready(Screenshot::new("a.png")).await.unwrap();
        assert_eq!(shot.file_name(), "a.png");
    }

    #[tokio::test]
    async fn test_failed_capture_rejects() {
        let err = ScreenshotCapture::failed(CaptureError::Failed("display gone".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("display gone"));
    }

    #[tokio::test]
    async fn test_deferred_capture_resolves() {
        let capture = ScreenshotCapture::from_future(async {
            tokio::task::yield_now().await;
            Ok(Screenshot::new("/tmp/later.png"))
        });
        assert_eq!(capture.await.unwrap().file_name(), "later.png");
    }
}
