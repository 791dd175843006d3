//! TLS configuration for the retrieval transport.
//!
//! This module holds the two independent TLS knobs a transfer can carry and
//! combines them into a single rustls client configuration.
//!
//! # Custom Trust Roots
//!
//! ```ignore
//! use gurl_net::tls::{TlsConfig, TrustStore};
//!
//! // Replaces the bundled web PKI roots for this transfer
//! let trust = TrustStore::from_pem_file("/path/to/ca.crt")?;
//! let config = TlsConfig::new().trust_store(trust).build_rustls_config()?;
//! ```
//!
//! # Client Certificates (mTLS)
//!
//! ```ignore
//! use gurl_net::tls::{Identity, TlsConfig};
//!
//! // A combined PEM (certificate chain followed by the private key)
//! let identity = Identity::from_pem_combined(pem_bytes)?;
//! let config = TlsConfig::new().identity(identity).build_rustls_config()?;
//! ```
//!
//! PKCS#12 bundles are turned into an [`Identity`] by
//! [`crate::credential::decode_pkcs12`].

use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::sign::CertifiedKey;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::error::{NetworkError, Result};

/// ALPN protocol advertised on every connection.
const ALPN_HTTP1: &[u8] = b"http/1.1";

/// The crypto provider used for both key validation and handshakes.
pub(crate) fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Client identity for mutual TLS (mTLS) authentication.
///
/// An identity consists of a client certificate chain and its corresponding
/// private key. Construction only succeeds when the key matches the leaf
/// certificate, so a half-usable identity can never reach the handshake.
pub struct Identity {
    cert_chain: Vec<CertificateDer<'static>>,
    private_key: PrivateKeyDer<'static>,
}

impl Clone for Identity {
    fn clone(&self) -> Self {
        Self {
            cert_chain: self.cert_chain.clone(),
            private_key: self.private_key.clone_key(),
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("cert_count", &self.cert_chain.len())
            .field("has_key", &true)
            .finish()
    }
}

impl Identity {
    /// Create an identity from a combined PEM buffer containing both the
    /// certificate chain (leaf first) and the private key.
    pub fn from_pem_combined(pem_data: impl AsRef<[u8]>) -> Result<Self> {
        let pem = pem_data.as_ref();

        let mut cert_reader = BufReader::new(Cursor::new(pem));
        let cert_chain: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_reader)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| NetworkError::Identity(format!("Failed to parse certificate PEM: {e}")))?;

        if cert_chain.is_empty() {
            return Err(NetworkError::Identity(
                "No certificates found in PEM data".to_string(),
            ));
        }

        // PKCS#1, PKCS#8 and SEC1 keys are all accepted here
        let mut key_reader = BufReader::new(Cursor::new(pem));
        let private_key = rustls_pemfile::private_key(&mut key_reader)
            .map_err(|e| NetworkError::Identity(format!("Failed to parse private key PEM: {e}")))?
            .ok_or_else(|| NetworkError::Identity("No private key found in PEM data".to_string()))?;

        let identity = Self {
            cert_chain,
            private_key,
        };
        identity.verify_key_pair()?;
        Ok(identity)
    }

    /// Check that the private key loads and belongs to the leaf certificate.
    fn verify_key_pair(&self) -> Result<()> {
        let provider = crypto_provider();
        let signing_key = provider
            .key_provider
            .load_private_key(self.private_key.clone_key())
            .map_err(|e| NetworkError::Identity(format!("Unusable private key: {e}")))?;

        CertifiedKey::new(self.cert_chain.clone(), signing_key)
            .keys_match()
            .map_err(|e| NetworkError::Identity(format!("Key does not match certificate: {e}")))
    }

    /// Get the certificate chain, leaf first.
    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    /// Get the private key.
    pub(crate) fn private_key(&self) -> &PrivateKeyDer<'static> {
        &self.private_key
    }
}

/// A pool of certificate authorities used in place of the bundled roots.
///
/// The pool holds exactly the certificates that parsed. A bundle without a
/// single usable certificate still produces a (empty) store; every server
/// certificate is then rejected during the handshake.
#[derive(Clone)]
pub struct TrustStore {
    roots: RootCertStore,
    skipped: usize,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("cert_count", &self.roots.len())
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl TrustStore {
    /// Build a store from PEM bytes holding one or more `CERTIFICATE` blocks.
    pub fn from_pem(pem_data: impl AsRef<[u8]>) -> Self {
        let mut reader = BufReader::new(Cursor::new(pem_data.as_ref()));
        let mut undecodable = 0;
        let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
            .filter_map(|cert| match cert {
                Ok(cert) => Some(cert),
                Err(e) => {
                    tracing::warn!(target: "gurl_net::tls", "Skipping malformed PEM block: {}", e);
                    undecodable += 1;
                    None
                }
            })
            .collect();

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(certs);
        if ignored > 0 {
            tracing::warn!(target: "gurl_net::tls", "Ignored {} unusable CA certificate(s)", ignored);
        }
        if added == 0 {
            tracing::warn!(
                target: "gurl_net::tls",
                "Trust bundle holds no usable certificates; every server certificate will be rejected"
            );
        }

        Self {
            roots,
            skipped: undecodable + ignored,
        }
    }

    /// Build a store from a PEM-encoded file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pem_data = std::fs::read(path).map_err(|e| NetworkError::read_file(path, e))?;
        let store = Self::from_pem(pem_data);
        tracing::debug!(
            target: "gurl_net::tls",
            "Loaded {} CA certificate(s) from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Number of certificates in the pool.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of PEM certificates that were present but could not be used.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Complete TLS configuration for a transfer.
///
/// Both knobs are optional and independent: without an identity no client
/// certificate is presented, and without a trust store the bundled web PKI
/// roots are used.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Client identity for mutual TLS.
    pub identity: Option<Identity>,
    /// Trust anchors replacing the default roots.
    pub trust_store: Option<TrustStore>,
}

impl TlsConfig {
    /// Create a new TLS configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client identity for mutual TLS.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Replace the default roots with a custom trust store.
    pub fn trust_store(mut self, store: TrustStore) -> Self {
        self.trust_store = Some(store);
        self
    }

    /// Check if this configuration has any custom settings.
    pub fn is_default(&self) -> bool {
        self.identity.is_none() && self.trust_store.is_none()
    }

    /// Build a rustls ClientConfig from this TLS configuration.
    ///
    /// Both inputs are already validated, so this only fails if rustls
    /// itself rejects the combination.
    pub fn build_rustls_config(&self) -> Result<ClientConfig> {
        let builder = ClientConfig::builder_with_provider(crypto_provider())
            .with_safe_default_protocol_versions()
            .map_err(|e| NetworkError::Tls(format!("Unsupported protocol versions: {e}")))?
            .with_root_certificates(self.build_root_store());

        let mut config = if let Some(ref identity) = self.identity {
            builder
                .with_client_auth_cert(
                    identity.cert_chain().to_vec(),
                    identity.private_key().clone_key(),
                )
                .map_err(|e| NetworkError::Tls(format!("Invalid client certificate: {e}")))?
        } else {
            builder.with_no_client_auth()
        };

        config.alpn_protocols = vec![ALPN_HTTP1.to_vec()];

        Ok(config)
    }

    /// Build the root certificate store.
    fn build_root_store(&self) -> RootCertStore {
        match self.trust_store {
            Some(ref store) => store.roots.clone(),
            None => system_roots(),
        }
    }
}

/// Load the operating system's trust anchors.
///
/// `SSL_CERT_FILE` and `SSL_CERT_DIR` are honoured. Falls back to the bundled
/// web PKI roots when the platform store yields nothing usable.
fn system_roots() -> RootCertStore {
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        tracing::warn!(target: "gurl_net::tls", "Error loading system root certificates: {}", err);
    }

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    if ignored > 0 {
        tracing::debug!(target: "gurl_net::tls", "Ignored {} unusable system root(s)", ignored);
    }
    if added == 0 {
        tracing::warn!(
            target: "gurl_net::tls",
            "No usable system root certificates; using bundled web PKI roots"
        );
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    } else {
        tracing::debug!(target: "gurl_net::tls", "Loaded {} system root certificate(s)", added);
    }
    roots
}
