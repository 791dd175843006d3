//! The retrieval pipeline: request, TLS, transport, response.

use std::io::{self, Write};

use crate::config::FetchConfig;
use crate::credential::{self, PassphraseProvider};
use crate::error::Result;
use crate::http::{HttpClient, OutputSink, RequestDescriptor, ResponseStreamer, TransferSummary};
use crate::tls::{TlsConfig, TrustStore};

/// Assemble the TLS configuration described by `config`.
///
/// The passphrase is requested only when a credential bundle is configured.
pub fn load_tls_config(config: &FetchConfig, passphrase: &dyn PassphraseProvider) -> Result<TlsConfig> {
    let mut tls = TlsConfig::new();
    if let Some(ref path) = config.credential_path {
        tls = tls.identity(credential::load_identity(path, passphrase)?);
    }
    if let Some(ref path) = config.trust_root_path {
        tls = tls.trust_store(TrustStore::from_pem_file(path)?);
    }
    Ok(tls)
}

/// Run one retrieval, dumping headers (if enabled) to standard output.
pub fn fetch(config: &FetchConfig, passphrase: &dyn PassphraseProvider) -> Result<TransferSummary> {
    fetch_with(
        config,
        passphrase,
        &mut io::stdout(),
        ResponseStreamer::new(config.show_progress),
    )
}

/// Run one retrieval with an explicit header destination and streamer.
///
/// The URL is validated before the passphrase is requested and before any
/// network activity. The response body and the sink are closed before this
/// returns, whether or not the transfer succeeded.
pub fn fetch_with<W: Write + ?Sized>(
    config: &FetchConfig,
    passphrase: &dyn PassphraseProvider,
    header_out: &mut W,
    streamer: ResponseStreamer,
) -> Result<TransferSummary> {
    let request = RequestDescriptor::compose(config)?;
    let tls = load_tls_config(config, passphrase)?;

    let mut builder = HttpClient::builder().tls_config(tls);
    if !config.use_env_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build()?;

    let response = client.send(&request)?;
    if config.show_headers {
        response.head().write_to(header_out)?;
    }

    let (head, body) = response.into_parts();
    let mut sink = OutputSink::open(config.output.as_deref())?;
    streamer.stream(body, head.declared_length(), &mut sink)
}
