//! Networking engine for gurl.
//!
//! This crate performs a single HTTP(S) retrieval:
//!
//! - **Credentials**: PKCS#12 bundles decoded into a mutual-TLS client identity
//! - **Trust**: PEM CA bundles replacing the bundled web PKI roots
//! - **Transport**: a blocking client over a preconfigured rustls session
//! - **Streaming**: the body copied to stdout or a file, with optional progress
//!
//! # Example
//!
//! ```ignore
//! use gurl_net::{FetchConfig, TerminalPrompt, fetch};
//!
//! let config = FetchConfig::new("https://internal.example.com/report.csv")
//!     .credential_path("/etc/gurl/client.p12")
//!     .trust_root_path("/etc/gurl/ca.pem")
//!     .output("report.csv")
//!     .show_progress(true);
//!
//! let summary = fetch(&config, &TerminalPrompt)?;
//! println!("{} bytes", summary.bytes_copied);
//! ```
//!
//! # Order of operations
//!
//! The request is composed first, so a missing or malformed URL fails before
//! the passphrase prompt. The TLS configuration is then assembled, the
//! connection made and the response head read. Headers are dumped if asked
//! for, then the body is streamed to its sink. Any failure ends the transfer.

pub mod config;
pub mod credential;
mod error;
mod fetch;
pub mod http;
pub mod tls;

pub use config::{DEFAULT_USER_AGENT, FetchConfig};
pub use credential::{EnvPassphrase, FixedPassphrase, PassphraseProvider, TerminalPrompt};
pub use error::{NetworkError, Result};
pub use fetch::{fetch, fetch_with, load_tls_config};
pub use http::{ResponseHead, ResponseStreamer, TransferProgress, TransferSummary};
pub use tls::{Identity, TlsConfig, TrustStore};
