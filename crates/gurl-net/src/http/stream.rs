//! Streaming of the response body to its sink.
//!
//! The body is copied as-is. When the sink is a file, progress was requested
//! and the response declares its length, the body is read through a
//! [`ProgressProxy`] that drives a progress bar on stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::error::{NetworkError, Result};

const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Where the response body goes.
#[derive(Debug)]
pub enum OutputSink {
    /// The process's standard output.
    Stdout(io::Stdout),
    /// A file created (or truncated) for this transfer.
    File {
        /// Open handle.
        file: File,
        /// Path it was opened at.
        path: PathBuf,
    },
}

impl OutputSink {
    /// Use standard output.
    pub fn stdout() -> Self {
        Self::Stdout(io::stdout())
    }

    /// Create or truncate `path`, readable and writable by the owner only.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(path).map_err(|source| NetworkError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::File {
            file,
            path: path.to_path_buf(),
        })
    }

    /// A file sink if `path` is given, standard output otherwise.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::create(path),
            None => Ok(Self::stdout()),
        }
    }

    /// Whether this sink writes to a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::File { file, .. } => file.flush(),
        }
    }
}

/// Progress information for a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferProgress {
    /// Number of bytes transferred so far.
    pub bytes_transferred: u64,
    /// Total number of bytes, if known.
    pub total_bytes: Option<u64>,
}

impl TransferProgress {
    /// Get the progress as a fraction (0.0 to 1.0), if total is known.
    pub fn fraction(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                1.0
            } else {
                self.bytes_transferred as f64 / total as f64
            }
        })
    }

    /// Get the progress as a percentage (0 to 100), if total is known.
    pub fn percent(&self) -> Option<u8> {
        self.fraction().map(|f| (f * 100.0).min(100.0) as u8)
    }
}

/// A passthrough reader that counts bytes against a known total and
/// advances a progress bar.
pub struct ProgressProxy<R> {
    inner: R,
    bar: ProgressBar,
    total: u64,
    transferred: u64,
}

impl<R: Read> ProgressProxy<R> {
    /// Wrap `inner`, expecting `total` bytes, drawing to `target`.
    pub fn new(inner: R, total: u64, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), target);
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            inner,
            bar,
            total,
            transferred: 0,
        }
    }

    /// Current progress.
    pub fn progress(&self) -> TransferProgress {
        TransferProgress {
            bytes_transferred: self.transferred,
            total_bytes: Some(self.total),
        }
    }

    /// Stop rendering and return the final progress.
    pub fn finish(self) -> TransferProgress {
        self.bar.finish();
        self.progress()
    }
}

impl<R: Read> Read for ProgressProxy<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.transferred += n as u64;
        self.bar.inc(n as u64);
        Ok(n)
    }
}

impl<R> std::fmt::Debug for ProgressProxy<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressProxy")
            .field("total", &self.total)
            .field("transferred", &self.transferred)
            .finish()
    }
}

/// Outcome of a completed transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferSummary {
    /// Bytes written to the sink.
    pub bytes_copied: u64,
    /// Final progress, if progress was reported.
    pub progress: Option<TransferProgress>,
}

/// Copies a response body into an [`OutputSink`].
pub struct ResponseStreamer {
    show_progress: bool,
    draw_target: ProgressDrawTarget,
}

impl std::fmt::Debug for ResponseStreamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStreamer")
            .field("show_progress", &self.show_progress)
            .finish()
    }
}

impl ResponseStreamer {
    /// Create a streamer; progress is drawn on stderr when requested.
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            draw_target: ProgressDrawTarget::stderr(),
        }
    }

    /// Draw progress somewhere other than stderr.
    pub fn draw_target(mut self, target: ProgressDrawTarget) -> Self {
        self.draw_target = target;
        self
    }

    /// Copy all of `body` into `sink`.
    ///
    /// Progress is reported only for file sinks with a known `declared_len`;
    /// otherwise the copy runs unreported. I/O errors abort the copy and may
    /// leave a truncated file behind.
    pub fn stream<R: Read>(
        self,
        body: R,
        declared_len: Option<u64>,
        sink: &mut OutputSink,
    ) -> Result<TransferSummary> {
        let wants_progress = self.show_progress && sink.is_file();
        if wants_progress && declared_len.is_none() {
            tracing::debug!(target: "gurl_net::http", "No declared length; progress disabled");
        }
        let total = declared_len.filter(|_| wants_progress);

        let summary = match total {
            Some(total) => {
                let mut proxy = ProgressProxy::new(body, total, self.draw_target);
                let bytes_copied = io::copy(&mut proxy, sink)?;
                TransferSummary {
                    bytes_copied,
                    progress: Some(proxy.finish()),
                }
            }
            None => {
                let mut body = body;
                let bytes_copied = io::copy(&mut body, sink)?;
                TransferSummary {
                    bytes_copied,
                    progress: None,
                }
            }
        };
        sink.flush()?;

        tracing::debug!(target: "gurl_net::http", "Copied {} byte(s)", summary.bytes_copied);
        Ok(summary)
    }
}
