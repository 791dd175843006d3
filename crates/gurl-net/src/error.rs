//! Error types for the networking engine.

use std::path::PathBuf;

/// Errors raised while assembling the transport or running a transfer.
///
/// Every variant is fatal for the invocation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// No request target was supplied.
    #[error("missing URL")]
    MissingUrl,

    /// The request target could not be used.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The method override is not a valid HTTP method token.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Invalid header name or value.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The PKCS#12 bundle could not be decoded.
    #[error("PKCS#12 error: {0}")]
    Credential(String),

    /// The decoded certificate and private key do not form a usable pair.
    #[error("Invalid client certificate: {0}")]
    Identity(String),

    /// TLS configuration error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The passphrase could not be obtained.
    #[error("Failed to read passphrase: {0}")]
    Prompt(String),

    /// A credential or trust bundle file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    ReadFile {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be opened.
    #[error("Failed to open output '{}': {source}", .path.display())]
    Output {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// Connection refused or failed, including TLS handshake failures.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// I/O error during the transfer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    /// Create a file read error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        // The source chain carries the handshake or socket detail.
        let message = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(message)
        } else {
            Self::Request(message)
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<http::method::InvalidMethod> for NetworkError {
    fn from(err: http::method::InvalidMethod) -> Self {
        Self::InvalidMethod(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
