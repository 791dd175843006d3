//! Blocking HTTP(S) transport.

use reqwest::redirect::Policy;

use super::request::RequestDescriptor;
use super::response::ResponseHead;
use crate::error::Result;
use crate::tls::TlsConfig;

/// Builder for the transport.
pub struct HttpClientBuilder {
    tls: TlsConfig,
    use_env_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            tls: TlsConfig::default(),
            use_env_proxy: true,
        }
    }

    /// Set the complete TLS configuration.
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls = config;
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }

    /// Build the transport.
    ///
    /// One request per client: no redirects are followed, no timeout is
    /// applied and bodies are not decompressed.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = reqwest::blocking::Client::builder()
            .use_preconfigured_tls(self.tls.build_rustls_config()?)
            .redirect(Policy::none())
            .timeout(None::<std::time::Duration>)
            .pool_max_idle_per_host(0);

        if !self.use_env_proxy {
            builder = builder.no_proxy();
        }

        Ok(HttpClient {
            client: builder.build()?,
        })
    }
}

/// A blocking client that sends a [`RequestDescriptor`].
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a builder for configuring a new client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Send the request and wait for the response head.
    pub fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(http::header::USER_AGENT, request.user_agent.clone());
        if let Some(ref body) = request.body {
            builder = builder.body(body.to_vec());
        }

        tracing::info!(target: "gurl_net::http", "{} {}", request.method, request.url);
        let response = builder.send()?;
        let head = ResponseHead::from_reqwest(&response);
        tracing::info!(target: "gurl_net::http", "{}", head.status_line());

        Ok(HttpResponse {
            head,
            body: response,
        })
    }
}

/// A response whose head has arrived and whose body is still on the wire.
pub struct HttpResponse {
    head: ResponseHead,
    body: reqwest::blocking::Response,
}

impl HttpResponse {
    /// Status line and headers.
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Split into the head and a reader over the body.
    pub fn into_parts(self) -> (ResponseHead, impl std::io::Read) {
        (self.head, self.body)
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.head.status)
            .field("url", &self.body.url().as_str())
            .finish()
    }
}
