//! Shared fixtures and an in-process TLS server for integration tests.

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rustls::crypto::CryptoProvider;
use rustls::server::WebPkiClientVerifier;
use rustls::{ClientConfig, ClientConnection, RootCertStore, ServerConfig, ServerConnection, StreamOwned};
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName};

/// Passphrase protecting `client.p12`.
pub const CLIENT_P12_PASSPHRASE: &str = "hunter2";

/// Absolute path of a fixture file.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

fn certs(name: &str) -> Vec<CertificateDer<'static>> {
    let pem = std::fs::read(fixture(name)).unwrap();
    rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn key(name: &str) -> PrivateKeyDer<'static> {
    let pem = std::fs::read(fixture(name)).unwrap();
    rustls_pemfile::private_key(&mut pem.as_slice()).unwrap().unwrap()
}

/// Server presenting `server.pem`, not asking for a client certificate.
pub fn server_config() -> Arc<ServerConfig> {
    let config = ServerConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs("server.pem"), key("server.key"))
        .unwrap();
    Arc::new(config)
}

/// Server presenting `server.pem` and requiring a client certificate issued
/// by the test CA.
pub fn mtls_server_config() -> Arc<ServerConfig> {
    let mut roots = RootCertStore::empty();
    for cert in certs("ca.pem") {
        roots.add(cert).unwrap();
    }
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider())
        .build()
        .unwrap();

    let config = ServerConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_client_cert_verifier(verifier)
        .with_single_cert(certs("server.pem"), key("server.key"))
        .unwrap();
    Arc::new(config)
}

/// Move pending TLS records from one connection to the other, returning the
/// number of bytes moved.
macro_rules! pump {
    ($from:expr, $to:expr) => {{
        let mut buf = Vec::new();
        while $from.wants_write() {
            $from.write_tls(&mut buf).unwrap();
        }
        let mut remaining = buf.as_slice();
        while !remaining.is_empty() {
            $to.read_tls(&mut remaining).unwrap();
            $to.process_new_packets()?;
        }
        buf.len()
    }};
}

/// Drive a complete handshake between two in-memory connections.
pub fn handshake(client: ClientConfig, server: Arc<ServerConfig>) -> Result<(), rustls::Error> {
    let name = ServerName::try_from("localhost").unwrap();
    let mut client = ClientConnection::new(Arc::new(client), name)?;
    let mut server = ServerConnection::new(server)?;

    for _ in 0..32 {
        if !client.is_handshaking() && !server.is_handshaking() {
            break;
        }
        let moved = pump!(client, server) + pump!(server, client);
        if moved == 0 {
            break;
        }
    }

    if client.is_handshaking() || server.is_handshaking() {
        Err(rustls::Error::General("handshake stalled".to_string()))
    } else {
        Ok(())
    }
}

/// A one-shot HTTPS server answering a single request with canned bytes.
pub struct TestServer {
    /// Address it listens on.
    pub addr: SocketAddr,
    handle: JoinHandle<io::Result<Vec<u8>>>,
}

impl TestServer {
    /// Serve `response` to the first connection.
    pub fn start(config: Arc<ServerConfig>, response: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (tcp, _) = listener.accept()?;
            let conn = ServerConnection::new(config).map_err(io::Error::other)?;
            let mut tls = StreamOwned::new(conn, tcp);
            let request = read_request(&mut tls)?;
            tls.write_all(&response)?;
            tls.conn.send_close_notify();
            tls.flush()?;
            Ok(request)
        });
        Self { addr, handle }
    }

    /// URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("https://{}{}", self.addr, path)
    }

    /// Wait for the server and return the raw request it received.
    pub fn finish(self) -> io::Result<Vec<u8>> {
        self.handle.join().unwrap()
    }
}

/// Read the request head plus a `Content-Length` body.
fn read_request<S: Read>(stream: &mut S) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed before request"));
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < head_end + body_len {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    Ok(data)
}

/// A `200 OK` response with the given extra headers and a sized body.
pub fn sized_response(extra_headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = String::from("HTTP/1.1 200 OK\r\n");
    for (name, value) in extra_headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()));
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// A `200 OK` response with a chunked body and no declared length.
pub fn chunked_response(chunks: &[&[u8]]) -> Vec<u8> {
    let mut bytes =
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_vec();
    for chunk in chunks {
        bytes.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        bytes.extend_from_slice(chunk);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(b"0\r\n\r\n");
    bytes
}
