//! HTTP request composition, transport and response streaming.
//!
//! # Example
//!
//! ```ignore
//! use gurl_net::http::{HttpClient, OutputSink, RequestDescriptor, ResponseStreamer};
//!
//! let request = RequestDescriptor::compose(&config)?;
//! let client = HttpClient::builder().tls_config(tls).build()?;
//!
//! let (head, body) = client.send(&request)?.into_parts();
//! let mut sink = OutputSink::create("/tmp/download.bin")?;
//! ResponseStreamer::new(true).stream(body, head.declared_length(), &mut sink)?;
//! ```

mod client;
mod request;
mod response;
mod stream;

pub use client::{HttpClient, HttpClientBuilder, HttpResponse};
pub use request::RequestDescriptor;
pub use response::{ResponseHead, canonical_header_name, declared_content_length};
pub use stream::{OutputSink, ProgressProxy, ResponseStreamer, TransferProgress, TransferSummary};
